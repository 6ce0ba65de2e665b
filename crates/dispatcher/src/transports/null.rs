//! NullTransport - accepts nothing

use std::sync::atomic::{AtomicBool, Ordering};

use contracts::{Message, Transport, TransportError};
use tracing::debug;

/// Transport that discards every message and accepts zero recipients
pub struct NullTransport {
    name: String,
    started: AtomicBool,
}

impl NullTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: AtomicBool::new(false),
        }
    }
}

impl Transport for NullTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    fn start(&self) -> Result<(), TransportError> {
        self.started.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&self) -> Result<(), TransportError> {
        self.started.store(false, Ordering::Release);
        Ok(())
    }

    fn send(&self, message: &Message) -> Result<usize, TransportError> {
        debug!(transport = %self.name, message_id = %message.id, "Message discarded");
        Ok(0)
    }
}
