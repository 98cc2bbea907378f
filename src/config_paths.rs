//! Centralized configuration paths for dockyard
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/dockyard/`
//! - Windows: `%APPDATA%\dockyard\`
//!
//! Layout files default to the `layouts/` subdirectory and rolling logs go
//! to `logs/`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "dockyard";

/// Base name of the rolling log file
pub const LOG_FILE_NAME: &str = "dockyard.log";

/// Base config directory for dockyard
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/dockyard`
///   - Else: `~/.config/dockyard`
///
/// Windows:
///   - `%APPDATA%\dockyard`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/dockyard/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/dockyard/layouts/`
pub fn layouts_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("layouts"))
}

/// `~/.config/dockyard/layouts/default.xml`
pub fn default_layout_file() -> Option<PathBuf> {
    layouts_dir().map(|dir| dir.join("default.xml"))
}

/// `~/.config/dockyard/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Create the logs dir (and its parents) if needed, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
