//! Dockyard configuration persistence
//!
//! Stores user preferences in `~/.config/dockyard/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::document::ROOT_ELEMENT;
use crate::layout::SaveOptions;

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockyardConfig {
    /// Spaces per nesting level in written layout files
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Emit the walk depth on leaf elements
    #[serde(default)]
    pub emit_index: bool,

    /// Tag of the layout document root
    #[serde(default = "default_root_element")]
    pub root_element: String,

    /// Layout file used when no path is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_layout: Option<PathBuf>,
}

fn default_indent_width() -> usize {
    4
}

fn default_root_element() -> String {
    ROOT_ELEMENT.to_string()
}

impl Default for DockyardConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            emit_index: false,
            root_element: default_root_element(),
            default_layout: None,
        }
    }
}

impl DockyardConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Configured layout path, else `~/.config/dockyard/layouts/default.xml`
    pub fn layout_path(&self) -> Option<PathBuf> {
        self.default_layout
            .clone()
            .or_else(crate::config_paths::default_layout_file)
    }
}

impl From<&DockyardConfig> for SaveOptions {
    fn from(config: &DockyardConfig) -> Self {
        SaveOptions {
            indent: config.indent_width,
            emit_index: config.emit_index,
            root_element: config.root_element.clone(),
        }
    }
}
