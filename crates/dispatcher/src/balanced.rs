//! BalancedTransport - a RotatingDispatcher exposed as a Transport
//!
//! Lets one dispatcher sit inside another's rotation. Lifecycle calls map onto
//! the dispatcher: `is_started` is `is_active`, `start` is `activate`, `stop`
//! is `deactivate` and `send` is `dispatch`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{Message, Transport, TransportError};

use crate::dispatcher::RotatingDispatcher;

/// Transport that delegates to a nested RotatingDispatcher
pub struct BalancedTransport {
    name: String,
    inner: Mutex<RotatingDispatcher>,
}

impl BalancedTransport {
    pub fn new(name: impl Into<String>, dispatcher: RotatingDispatcher) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(dispatcher),
        }
    }

    /// Exclusive access to the nested dispatcher
    pub fn dispatcher(&self) -> MutexGuard<'_, RotatingDispatcher> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for BalancedTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_started(&self) -> bool {
        self.dispatcher().is_active()
    }

    fn start(&self) -> Result<(), TransportError> {
        self.dispatcher().activate();
        Ok(())
    }

    fn stop(&self) -> Result<(), TransportError> {
        self.dispatcher()
            .deactivate()
            .map_err(|e| TransportError::stop(&self.name, e.to_string()))
    }

    fn send(&self, message: &Message) -> Result<usize, TransportError> {
        // Exhaustion of the nested pool surfaces as a send failure, so the
        // outer dispatcher quarantines this transport.
        self.dispatcher()
            .dispatch(message)
            .map_err(|e| TransportError::send(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_log::MemoryLog;
    use crate::transports::{CallJournal, MockBehavior, MockTransport};
    use contracts::SharedTransport;
    use std::sync::Arc;

    fn message() -> Message {
        Message::new("m1", "ops@example.com", vec!["a@example.com".into()])
    }

    fn dispatcher(name: &str, transports: Vec<SharedTransport>) -> RotatingDispatcher {
        let mut dispatcher = RotatingDispatcher::new(name, Arc::new(MemoryLog::new()));
        dispatcher.configure(transports);
        dispatcher
    }

    #[test]
    fn test_lifecycle_maps_onto_dispatcher() {
        let a = Arc::new(MockTransport::new("a", MockBehavior::Accept(1)));
        let balanced = BalancedTransport::new(
            "pool",
            dispatcher("inner", vec![Arc::clone(&a) as SharedTransport]),
        );
        assert_eq!(balanced.name(), "pool");
        assert!(balanced.is_started());

        assert_eq!(balanced.send(&message()).unwrap(), 1);
        assert!(a.is_started());

        balanced.stop().unwrap();
        assert_eq!(a.stop_count(), 1);
    }

    #[test]
    fn test_exhausted_inner_reports_send_error() {
        let a = Arc::new(MockTransport::new("a", MockBehavior::Fail));
        let balanced = BalancedTransport::new(
            "pool",
            dispatcher("inner", vec![Arc::clone(&a) as SharedTransport]),
        );

        let err = balanced.send(&message()).unwrap_err();
        assert!(matches!(err, TransportError::Send { .. }));
        assert!(!balanced.is_started());
        assert_eq!(balanced.dispatcher().quarantined_names(), vec!["a"]);
    }

    #[test]
    fn test_stop_failure_maps_to_stop_error() {
        let a = Arc::new(MockTransport::new("a", MockBehavior::Accept(1)).failing_stop());
        let balanced = BalancedTransport::new(
            "pool",
            dispatcher("inner", vec![Arc::clone(&a) as SharedTransport]),
        );
        let err = balanced.stop().unwrap_err();
        assert!(matches!(err, TransportError::Stop { .. }));
    }

    #[test]
    fn test_outer_dispatcher_quarantines_exhausted_inner_and_fails_over() {
        let journal = CallJournal::new();
        let a = Arc::new(MockTransport::new("a", MockBehavior::Fail).with_journal(&journal));
        let b = Arc::new(MockTransport::new("b", MockBehavior::Fail).with_journal(&journal));
        let backup =
            Arc::new(MockTransport::new("backup", MockBehavior::AcceptAll).with_journal(&journal));

        let inner = Arc::new(BalancedTransport::new(
            "pool",
            dispatcher(
                "inner",
                vec![Arc::clone(&a) as SharedTransport, Arc::clone(&b) as SharedTransport],
            ),
        ));
        let mut outer = dispatcher(
            "outer",
            vec![
                Arc::clone(&inner) as SharedTransport,
                Arc::clone(&backup) as SharedTransport,
            ],
        );

        assert_eq!(outer.dispatch(&message()).unwrap(), 1);
        assert_eq!(outer.working_names(), vec!["backup"]);
        assert_eq!(outer.quarantined_names(), vec!["pool"]);
        assert_eq!(journal.names_for("send"), vec!["a", "b", "backup"]);
        assert_eq!(inner.dispatcher().quarantined_names(), vec!["a", "b"]);

        // Reviving the outer pool starts the inner one, which revives its own transports.
        a.set_behavior(MockBehavior::Accept(1));
        outer.activate();
        assert_eq!(outer.working_names(), vec!["backup", "pool"]);
        assert_eq!(outer.dispatch(&message()).unwrap(), 1);
        assert_eq!(outer.dispatch(&message()).unwrap(), 1);
        assert_eq!(inner.dispatcher().working_names(), vec!["b", "a"]);
        assert_eq!(
            journal.names_for("send"),
            vec!["a", "b", "backup", "backup", "a"]
        );
    }
}
