//! Error types for opskit

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using opskit's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for opskit
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Conversation log error: {0}")]
    Convo(#[from] ConvoError),

    #[error("Knowledge base error: {0}")]
    Kb(#[from] KbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Missing required environment variable: {0}. Set it in your local configuration or environment."
    )]
    MissingVariable(String),
}

/// Conversation-capture errors
#[derive(Error, Debug)]
pub enum ConvoError {
    #[error("Log not found: {0}")]
    LogNotFound(PathBuf),

    #[error("Raw log not found: {0}")]
    RawLogNotFound(PathBuf),
}

/// Failure knowledge-base errors
#[derive(Error, Debug)]
pub enum KbError {
    #[error("Error log not found: {0}")]
    LogNotFound(PathBuf),
}
