//! Error types for configuration loading.

use thiserror::Error;

/// Errors raised while parsing or validating configuration.
#[derive(Error, Debug)]
pub enum IrError {
    /// JSON (de)serialization failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed.
    #[error("invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization failed.
    #[error("failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, IrError>;
