//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Rotation ended with an empty working set
    #[error("all transports failed, or none available")]
    AllTransportsFailed,

    /// Transport error that is not handled locally (e.g. during deactivate)
    #[error("transport error: {0}")]
    Transport(#[from] contracts::TransportError),

    /// Transport creation error
    #[error("failed to create transport '{name}': {message}")]
    TransportCreation { name: String, message: String },
}

impl DispatcherError {
    /// Create a transport creation error
    pub fn transport_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
