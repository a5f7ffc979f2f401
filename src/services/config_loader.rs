// TabShell Config Loader
// Loads the shell configuration from a JSON file at the platform-specific
// config path, applies environment overrides and validates the result.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::platform;
use crate::types::config::ShellConfig;
use crate::types::errors::ConfigError;

pub const HOME_URL_ENV: &str = "TABSHELL_HOME_URL";
pub const UPDATE_OWNER_ENV: &str = "TABSHELL_UPDATE_OWNER";
pub const UPDATE_REPO_ENV: &str = "TABSHELL_UPDATE_REPO";

/// Trait defining the config loader interface.
pub trait ConfigLoaderTrait {
    fn load(&mut self) -> Result<ShellConfig, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn get_config(&self) -> &ShellConfig;
    fn get_config_path(&self) -> &Path;
}

/// Reads `config.json`; a missing file means defaults.
pub struct ConfigLoader {
    config_path: PathBuf,
    config: ShellConfig,
    apply_env: bool,
}

impl ConfigLoader {
    /// Uses `path_override` when given, otherwise `config.json` in the
    /// platform config directory.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path =
            path_override.unwrap_or_else(|| platform::get_config_dir().join("config.json"));
        Self {
            config_path,
            config: ShellConfig::default(),
            apply_env: true,
        }
    }

    /// Disables environment overrides, so results depend on the file only.
    pub fn without_env(mut self) -> Self {
        self.apply_env = false;
        self
    }
}

/// Applies overrides from `lookup` (normally `std::env::var`).
pub fn apply_overrides<F>(config: &mut ShellConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(home) = lookup(HOME_URL_ENV).filter(|v| !v.trim().is_empty()) {
        debug!(home_url = %home, "home URL overridden from environment");
        config.home_url = home;
    }
    if let Some(owner) = lookup(UPDATE_OWNER_ENV) {
        config.update.owner = owner;
    }
    if let Some(repo) = lookup(UPDATE_REPO_ENV) {
        config.update.repo = repo;
    }
}

/// Rejects values the shell cannot start with.
pub fn validate(config: &ShellConfig) -> Result<(), ConfigError> {
    if config.home_url.trim().is_empty() {
        return Err(ConfigError::InvalidValue("home_url must not be empty".to_string()));
    }
    if config.window.width == 0 || config.window.height == 0 {
        return Err(ConfigError::InvalidValue(format!(
            "window size must be non-zero, got {}x{}",
            config.window.width, config.window.height
        )));
    }
    if config.chrome.initial_offset == 0 {
        return Err(ConfigError::InvalidValue(
            "chrome.initial_offset must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

impl ConfigLoaderTrait for ConfigLoader {
    /// Missing file: defaults. Malformed file: serialization error.
    fn load(&mut self) -> Result<ShellConfig, ConfigError> {
        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)
                .map_err(|e| ConfigError::Io(format!("Failed to read config file: {}", e)))?;
            serde_json::from_str(&content).map_err(|e| {
                ConfigError::Serialization(format!("Failed to parse config file: {}", e))
            })?
        } else {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            ShellConfig::default()
        };

        if self.apply_env {
            apply_overrides(&mut config, |key| std::env::var(key).ok());
        }
        validate(&config)?;

        info!(path = %self.config_path.display(), home_url = %config.home_url, "configuration loaded");
        self.config = config;
        Ok(self.config.clone())
    }

    /// Creates parent directories as needed.
    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Io(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::Serialization(format!("Failed to serialize config: {}", e))
        })?;
        fs::write(&self.config_path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    fn get_config(&self) -> &ShellConfig {
        &self.config
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
