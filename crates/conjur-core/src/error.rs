//! Error types for conjur-core

use conjur_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Either --check or '-- external_command' option should be provided")]
    MissingModeOption,

    #[error("Options '--check' and '-- external_command' can not be provided together")]
    MutuallyExclusiveOptions,

    /// Mapping file missing or malformed
    #[error(transparent)]
    Config(#[from] conjur_config::ConfigError),

    /// A per-secret fetch failed; `source` keeps the store's error kind
    #[error("{source}")]
    SingleResolutionFailed { path: String, source: ApiError },

    #[error("Some variables are not available")]
    UnavailableVariables { paths: Vec<String> },

    #[error("Failed to execute '{command}': {source}")]
    HandoffFailed {
        command: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] ApiError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
