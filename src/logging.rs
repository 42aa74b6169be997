use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `fallback` (the config's `log_filter`), then `info`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(fallback: &str) {
    let initialized = tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(false)
        .try_init();
    if initialized.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
