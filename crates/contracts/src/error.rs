//! Layered error definitions
//!
//! Categorized by source: config / transport

use thiserror::Error;

/// Error raised by an individual transport
///
/// The dispatcher recovers from it locally during `send` (the transport is
/// quarantined) and swallows it during quarantine cleanup.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Transport could not be started
    #[error("transport '{transport}' failed to start: {message}")]
    Start { transport: String, message: String },

    /// Transport could not deliver a message
    #[error("transport '{transport}' send error: {message}")]
    Send { transport: String, message: String },

    /// Transport could not be stopped cleanly
    #[error("transport '{transport}' failed to stop: {message}")]
    Stop { transport: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Create start error
    pub fn start(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Start {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create send error
    pub fn send(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Send {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create stop error
    pub fn stop(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stop {
            transport: transport.into(),
            message: message.into(),
        }
    }
}

/// Configuration and general errors
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
