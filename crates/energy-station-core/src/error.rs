//! Core error types for energy-station-core.
//!
//! Session commands themselves never fail at runtime; errors come from
//! constructing a session with an invalid definition, from rejected control
//! values (speed, timer minutes) and from the settings store.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for energy-station-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Content id not present in the catalog
    #[error("Unknown content id: {0}")]
    UnknownContent(String),

    /// Tick source could not be bound to an async runtime
    #[error("Runtime unavailable: {0}")]
    Runtime(String),
}

/// Settings-store errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load settings
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save settings
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid settings value
    #[error("Invalid settings value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a known setting
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Failed to parse settings
    #[error("Failed to parse settings: {0}")]
    ParseFailed(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
