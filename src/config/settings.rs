use anyhow::Result;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "LLMContextBuilder";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "llmcontextbuilder", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Resolves the directory to use, preferring an explicit override.
pub(crate) fn resolve_directory(dir_override: Option<&Path>) -> Result<PathBuf> {
    match dir_override {
        Some(dir) => Ok(dir.to_path_buf()),
        None => get_config_directory()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Loads the application configuration from the config file.
/// If the file doesn't exist, it creates a default one.
/// If the file is corrupted or cannot be parsed, it logs a warning
/// and falls back to the default configuration.
pub fn load_config(dir_override: Option<&Path>) -> Result<AppConfig> {
    let config_dir = resolve_directory(dir_override)?;
    let config_path = config_dir.join(CONFIG_FILE);

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default config at {:?}",
            config_path
        );
        let default_config = AppConfig::default();
        save_config(&default_config, Some(&config_dir))?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path)?;

    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(AppConfig::default())
        }
    }
}

/// Saves the provided configuration to the config file.
pub fn save_config(config: &AppConfig, dir_override: Option<&Path>) -> Result<()> {
    let config_dir = resolve_directory(dir_override)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
        tracing::info!("Created config directory: {:?}", config_dir);
    }

    let config_path = config_dir.join(CONFIG_FILE);
    let config_json = serde_json::to_string_pretty(config)?;

    fs::write(&config_path, config_json)?;
    tracing::debug!("Saved config to {:?}", config_path);

    Ok(())
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.llmcontextbuilder.LLMContextBuilder/
// Linux:   ~/.config/llmcontextbuilder/
// Windows: %APPDATA%/llmcontextbuilder/LLMContextBuilder/config/
