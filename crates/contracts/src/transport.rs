//! Transport trait - Dispatcher backend interface
//!
//! Defines the capability set the dispatcher load-balances over.

use std::sync::Arc;

use crate::{Message, TransportError};

/// Handle to a transport shared between the dispatcher and its constructor
pub type SharedTransport = Arc<dyn Transport>;

/// Message delivery backend
///
/// All transport implementations must implement this trait. Handles are shared,
/// so every method takes `&self`; implementations keep their state behind
/// interior mutability.
pub trait Transport: Send + Sync {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Concrete kind of transport, for diagnostics
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether `start` has completed and `stop` has not been called since
    fn is_started(&self) -> bool;

    /// Start the transport
    ///
    /// # Errors
    /// Returns start error (should include context)
    fn start(&self) -> Result<(), TransportError>;

    /// Stop the transport
    fn stop(&self) -> Result<(), TransportError>;

    /// Deliver a message
    ///
    /// Returns the number of recipients accepted for delivery.
    fn send(&self, message: &Message) -> Result<usize, TransportError>;
}
