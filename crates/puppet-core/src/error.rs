//! Error types for the puppet viewer

use thiserror::Error;

/// The main error type for puppet operations
#[derive(Debug, Error)]
pub enum PuppetError {
    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Invalid joint range for '{node}': min {min}, init {init}, max {max}")]
    InvalidJointRange {
        node: String,
        min: f64,
        init: f64,
        max: f64,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for puppet operations
pub type Result<T> = std::result::Result<T, PuppetError>;

impl From<toml::de::Error> for PuppetError {
    fn from(err: toml::de::Error) -> Self {
        PuppetError::TomlParse(err.to_string())
    }
}
