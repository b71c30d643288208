//! Viewer configuration loaded from TOML.

use crate::geocode::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Reverse geocoding settings
    pub geocoding: GeocodingSettings,
    /// Map route settings
    pub route: RouteSettings,
    /// Export settings
    pub export: ExportSettings,
}

/// Reverse geocoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingSettings {
    /// Resolve start/end town names over the network
    pub enabled: bool,
    /// Nominatim-compatible reverse endpoint
    pub base_url: String,
    /// User-Agent sent to the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
        }
    }
}

/// Route highlighting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    /// Half width in km of the window selected by clicking the route
    pub highlight_window_km: f64,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            highlight_window_km: 0.5,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Pretty-print JSON exports
    pub pretty_json: bool,
    /// Directory used when an export target is not given explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            pretty_json: true,
            output_dir: None,
        }
    }
}

/// Get the configuration directory.
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "ride-viewer", "RideViewer")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Load configuration from `path`, or from the default location.
///
/// A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig, ConfigError> {
    let path = path.map_or_else(get_config_path, Path::to_path_buf);

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ViewerConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save configuration to `path`, creating parent directories.
pub fn save_config(config: &ViewerConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
