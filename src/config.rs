//! Configuration types.

use std::path::PathBuf;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default endpoint base. Overridable to route through a forwarding proxy.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default data directory for the persisted archive.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// App configuration. The API key is handled separately as a secret.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Generation model identifier.
    pub model: String,
    /// Generation endpoint base URL.
    pub api_base: String,
    /// Directory holding the persisted archive document.
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl AppConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: std::env::var("CREAM_CRAFTER_MODEL").unwrap_or(defaults.model),
            api_base: std::env::var("CREAM_CRAFTER_API_BASE").unwrap_or(defaults.api_base),
            data_dir: std::env::var("CREAM_CRAFTER_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }
}
