//! Error types for the settings crate.

use std::io;
use thiserror::Error;
use trackforge_core::ConfigError;

/// Errors that can occur while loading, saving, or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file extension is neither `.json` nor `.toml`.
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// The platform has no configuration directory.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// A value failed validation.
    #[error("Invalid settings: {0}")]
    Invalid(#[from] ConfigError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlWriteError(#[from] toml::ser::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
