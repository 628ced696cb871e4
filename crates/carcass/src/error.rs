//! Error types for cut-list planning.

use thiserror::Error;

/// Errors returned while configuring, dimensioning or exporting a carcass.
#[derive(Error, Debug)]
pub enum CarcassError {
    /// The configuration is inconsistent or yields a non-positive piece.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be parsed.
    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration could not be rendered as TOML.
    #[error("cannot write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Packing failed.
    #[error(transparent)]
    Pack(#[from] carcass_pack::PackError),

    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for carcass operations.
pub type Result<T> = std::result::Result<T, CarcassError>;
