//! Error types for credential store access

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to connect to credential store: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request for {target} failed with HTTP {status}: {message}")]
    Http {
        target: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response for {target}: {message}")]
    Decode { target: String, message: String },

    #[error("{0}")]
    ConfigError(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl From<conjur_config::ConfigError> for ApiError {
    fn from(e: conjur_config::ConfigError) -> Self {
        ApiError::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
