use serde::{Deserialize, Serialize};

use super::update::UpdateMode;

/// Top-level shell configuration, read from `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    pub app_name: String,
    pub title: String,
    pub home_url: String,
    pub devtools: bool,
    pub window: WindowSettings,
    pub chrome: ChromeSettings,
    pub update: UpdateSettings,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_name: "TabShell".to_string(),
            title: "TabShell".to_string(),
            home_url: "https://github.com".to_string(),
            devtools: cfg!(debug_assertions),
            window: WindowSettings::default(),
            chrome: ChromeSettings::default(),
            update: UpdateSettings::default(),
        }
    }
}

/// Main window geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub decorations: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            min_width: 800,
            decorations: true,
        }
    }
}

/// Heights of the rendered chrome, in logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChromeSettings {
    pub toolbar_height: u32,
    pub tab_bar_height: u32,
    /// Offset used before the UI reports its real chrome height. Never zero.
    pub initial_offset: u32,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            toolbar_height: 44,
            tab_bar_height: 36,
            initial_offset: 80,
        }
    }
}

/// Release feed location and update behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpdateSettings {
    pub enabled: bool,
    pub owner: String,
    pub repo: String,
    pub api_base: String,
    pub mode: UpdateMode,
    pub check_interval_secs: u64,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            owner: String::new(),
            repo: String::new(),
            api_base: "https://api.github.com".to_string(),
            mode: UpdateMode::Manual,
            check_interval_secs: 180,
        }
    }
}

impl UpdateSettings {
    /// Updates can only be checked once a repository is configured.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.owner.is_empty() && !self.repo.is_empty()
    }
}
