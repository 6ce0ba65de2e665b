//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Message file could not be read or parsed
    #[error("Invalid message file {path}: {message}")]
    MessageLoad { path: String, message: String },

    /// Every transport failed for a message
    #[error("Message '{message_id}' could not be dispatched: {source}")]
    Dispatch {
        message_id: String,
        #[source]
        source: dispatcher::DispatcherError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn message_load(path: &Path, message: impl Into<String>) -> Self {
        Self::MessageLoad {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    pub fn dispatch(message_id: impl Into<String>, source: dispatcher::DispatcherError) -> Self {
        Self::Dispatch {
            message_id: message_id.into(),
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
