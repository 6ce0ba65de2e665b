//! LogTransport - logs message summary via tracing

use std::sync::atomic::{AtomicBool, Ordering};

use contracts::{Message, Transport, TransportError};
use tracing::{info, instrument};

/// Transport that logs message summaries and accepts every recipient
pub struct LogTransport {
    name: String,
    started: AtomicBool,
}

impl LogTransport {
    /// Create a new LogTransport with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: AtomicBool::new(false),
        }
    }

    fn log_message_summary(&self, message: &Message) {
        info!(
            transport = %self.name,
            message_id = %message.id,
            from = %message.from,
            recipients = message.recipient_count(),
            subject = %message.subject,
            body_bytes = message.body.len(),
            "Message delivered"
        );
    }
}

impl Transport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    #[instrument(name = "log_transport_start", skip(self), fields(transport = %self.name))]
    fn start(&self) -> Result<(), TransportError> {
        self.started.store(true, Ordering::Release);
        Ok(())
    }

    #[instrument(name = "log_transport_stop", skip(self), fields(transport = %self.name))]
    fn stop(&self) -> Result<(), TransportError> {
        self.started.store(false, Ordering::Release);
        info!(transport = %self.name, "LogTransport stopped");
        Ok(())
    }

    #[instrument(
        name = "log_transport_send",
        skip(self, message),
        fields(transport = %self.name, message_id = %message.id)
    )]
    fn send(&self, message: &Message) -> Result<usize, TransportError> {
        if !self.is_started() {
            return Err(TransportError::send(&self.name, "transport not started"));
        }
        self.log_message_summary(message);
        Ok(message.recipient_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> Message {
        Message::new(
            "m1",
            "ops@example.com",
            vec!["a@example.com".into(), "b@example.com".into()],
        )
    }

    #[test]
    fn test_log_transport_send() {
        let transport = LogTransport::new("test_log");
        transport.start().unwrap();

        let result = transport.send(&sample_message());
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_log_transport_requires_start() {
        let transport = LogTransport::new("test_log");
        assert!(!transport.is_started());
        assert!(transport.send(&sample_message()).is_err());
    }

    #[test]
    fn test_log_transport_lifecycle() {
        let transport = LogTransport::new("my_logger");
        assert_eq!(transport.name(), "my_logger");
        transport.start().unwrap();
        assert!(transport.is_started());
        transport.stop().unwrap();
        assert!(!transport.is_started());
    }

    #[test]
    fn test_log_transport_kind() {
        let transport = LogTransport::new("kind");
        assert!(transport.kind().ends_with("LogTransport"));
    }
}
