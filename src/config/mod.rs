pub mod recent_paths;
pub mod settings;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use recent_paths::{RecentPath, RecentPaths};

/// Which content provider the application talks to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderKind {
    /// Read the filesystem in-process.
    #[default]
    Local,
    /// Ask a server exposing `/api/list-directory` and `/api/get-files`.
    Remote { base_url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub include_file_map: bool,
    pub auto_preview: bool,
    pub error_banner_timeout_secs: u64,
    pub last_directory: Option<String>,
    pub window_size: (f64, f64),
    pub window_position: (f64, f64),
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        settings::load_config(None)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Local,
            include_file_map: true,
            auto_preview: true,
            error_banner_timeout_secs: 5,
            last_directory: None,
            window_size: (1200.0, 800.0),
            window_position: (100.0, 100.0),
        }
    }
}
