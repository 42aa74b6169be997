use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

pub const CONFIG_ENV: &str = "ADMIN_GRID_CONFIG";
const CONFIG_FILE_NAME: &str = "grid.toml";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "admin-grid", "AdminGrid")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

/// `$ADMIN_GRID_CONFIG` when set, otherwise `grid.toml` in the platform config dir.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|path| !path.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
