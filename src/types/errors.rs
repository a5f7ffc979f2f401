use std::fmt;

use super::tab::TabId;

// === ViewError ===

/// Errors raised by the host-side view registry.
#[derive(Debug)]
pub enum ViewError {
    /// A surface is already registered under the given tab.
    AlreadyExists(TabId),
    /// The platform failed to instantiate a content surface.
    SurfaceCreation(String),
    /// A surface rejected a command (navigation, bounds, visibility).
    Surface(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::AlreadyExists(id) => write!(f, "Surface already exists for {}", id),
            ViewError::SurfaceCreation(msg) => write!(f, "Surface creation failed: {}", msg),
            ViewError::Surface(msg) => write!(f, "Surface error: {}", msg),
        }
    }
}

impl std::error::Error for ViewError {}

// === ConfigError ===

/// Errors related to loading and saving the shell configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the config file.
    Io(String),
    /// The config file could not be parsed or serialized.
    Serialization(String),
    /// A config value is out of range or empty.
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::Serialization(msg) => write!(f, "Config serialization error: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// === UpdateError ===

/// Errors related to checking the release feed and fetching artifacts.
#[derive(Debug)]
pub enum UpdateError {
    /// A network error occurred while talking to the release feed.
    Network(String),
    /// The release feed returned something that could not be parsed.
    Parse(String),
    /// The running platform has no known artifact format.
    UnsupportedPlatform(String),
    /// Writing the downloaded artifact to disk failed.
    Io(String),
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::Network(msg) => write!(f, "Update network error: {}", msg),
            UpdateError::Parse(msg) => write!(f, "Update parse error: {}", msg),
            UpdateError::UnsupportedPlatform(name) => {
                write!(f, "Unsupported platform for update: {}", name)
            }
            UpdateError::Io(msg) => write!(f, "Update I/O error: {}", msg),
        }
    }
}

impl std::error::Error for UpdateError {}

// === IpcError ===

/// Errors raised while decoding messages posted by web content.
#[derive(Debug)]
pub enum IpcError {
    /// The message body is not valid JSON or lacks required fields.
    Malformed(String),
    /// The message names a command the shell does not know.
    UnknownCommand(String),
}

impl fmt::Display for IpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpcError::Malformed(msg) => write!(f, "Malformed IPC message: {}", msg),
            IpcError::UnknownCommand(cmd) => write!(f, "Unknown IPC command: {}", cmd),
        }
    }
}

impl std::error::Error for IpcError {}
