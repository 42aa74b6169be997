use admin_grid::app::{App, GridContext, StartupError, StartupFailure};
use admin_grid::config::GridConfig;
use admin_grid::logging::init_logging;
use admin_grid::platform::desktop::dirs::{default_config_path, default_webview_data_dir};

fn main() {
    let loaded = default_config_path().and_then(|path| {
        tracing::debug!(path = %path.display(), "loading config");
        GridConfig::load(&path)
    });
    let log_filter = loaded
        .as_ref()
        .map(|config| config.log_filter.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&log_filter);

    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "unable to prepare webview data dir");
            std::process::exit(1);
        }
    };

    let title = loaded
        .as_ref()
        .map(|config| config.title.clone())
        .unwrap_or_else(|_| GridConfig::default().title);

    let launcher = dioxus::LaunchBuilder::desktop().with_cfg(
        dioxus::desktop::Config::new()
            .with_window(dioxus::desktop::WindowBuilder::new().with_title(title))
            .with_data_directory(webview_data_dir),
    );

    match loaded.and_then(GridContext::from_config) {
        Ok(context) => launcher.with_context(context).launch(App),
        Err(err) => {
            let message = format!("{err:#}");
            tracing::error!(error = %message, "startup failed");
            launcher
                .with_context(StartupError(message))
                .launch(StartupFailure)
        }
    }
}
