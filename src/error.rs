/// error taxonomy shared by the cache and log sink adapters
///
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdapterError>;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// the backing facility is missing or disabled; raised at construction, never at first use
    #[error("{facility} is not available: {reason}")]
    ConfigurationUnavailable { facility: String, reason: String },

    /// the provider or store rejected the call; passed through unchanged
    #[error("{operation} failed: {reason}")]
    ProviderOperationFailed { operation: String, reason: String },

    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("invalid key pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to load config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl AdapterError {
    pub fn unavailable(facility: impl Into<String>, reason: impl Into<String>) -> AdapterError {
        AdapterError::ConfigurationUnavailable {
            facility: facility.into(),
            reason: reason.into(),
        }
    }

    pub fn provider(operation: impl Into<String>, reason: impl Into<String>) -> AdapterError {
        AdapterError::ProviderOperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
