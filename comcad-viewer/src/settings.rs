//! Canvas settings persisted between sessions.

use std::path::{Path, PathBuf};

use comcad_core::CanvasConfig;

/// `<config_dir>/comcad/canvas.json`, when the platform has a config dir.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("comcad").join("canvas.json"))
}

/// Load settings, falling back to defaults when missing or unreadable.
pub fn load_settings() -> CanvasConfig {
    match config_path() {
        Some(path) => load_from(&path),
        None => CanvasConfig::default(),
    }
}

pub fn load_from(path: &Path) -> CanvasConfig {
    if !path.exists() {
        return CanvasConfig::default();
    }
    match CanvasConfig::load(path) {
        Ok(config) => {
            tracing::info!("Loaded settings from {}", path.display());
            config
        }
        Err(e) => {
            tracing::warn!("Ignoring settings in {}: {}", path.display(), e);
            CanvasConfig::default()
        }
    }
}

/// Write settings; failures are logged, never fatal.
pub fn save_settings(config: &CanvasConfig) {
    if let Some(path) = config_path() {
        save_to(config, &path);
    }
}

pub fn save_to(config: &CanvasConfig, path: &Path) {
    match config.save(path) {
        Ok(()) => tracing::info!("Saved settings to {}", path.display()),
        Err(e) => tracing::error!("Failed to save settings to {}: {}", path.display(), e),
    }
}
