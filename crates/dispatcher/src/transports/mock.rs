//! MockTransport - scripted transport for tests and demos
//!
//! Records every lifecycle call into an optional shared [`CallJournal`] so
//! tests can assert on the exact order calls happened across transports.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use contracts::{Message, Transport, TransportError};

/// Ordered record of `"<name>.<call>"` entries shared between mocks
#[derive(Debug, Default, Clone)]
pub struct CallJournal {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded calls
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded calls of one kind (e.g. `"send"`), as transport names
    pub fn names_for(&self, call: &str) -> Vec<String> {
        let suffix = format!(".{call}");
        self.calls()
            .into_iter()
            .filter_map(|entry| entry.strip_suffix(&suffix).map(str::to_string))
            .collect()
    }

    fn record(&self, name: &str, call: &str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{name}.{call}"));
    }
}

/// How a MockTransport answers `send`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Accept a fixed number of recipients
    Accept(usize),
    /// Accept every recipient of the message
    AcceptAll,
    /// Fail with a send error
    Fail,
}

/// Scripted transport
pub struct MockTransport {
    name: String,
    behavior: Mutex<MockBehavior>,
    fail_start: bool,
    fail_stop: bool,
    started: AtomicBool,
    start_count: AtomicUsize,
    stop_count: AtomicUsize,
    send_count: AtomicUsize,
    journal: Option<CallJournal>,
}

impl MockTransport {
    pub fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            behavior: Mutex::new(behavior),
            fail_start: false,
            fail_stop: false,
            started: AtomicBool::new(false),
            start_count: AtomicUsize::new(0),
            stop_count: AtomicUsize::new(0),
            send_count: AtomicUsize::new(0),
            journal: None,
        }
    }

    /// Record calls into `journal`
    pub fn with_journal(mut self, journal: &CallJournal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    /// Make `start` fail
    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Make `stop` fail
    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Change how subsequent `send` calls behave
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap_or_else(PoisonError::into_inner) = behavior;
    }

    pub fn start_count(&self) -> usize {
        self.start_count.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }

    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    fn record(&self, call: &str) {
        if let Some(journal) = &self.journal {
            journal.record(&self.name, call);
        }
    }
}

impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn start(&self) -> Result<(), TransportError> {
        self.start_count.fetch_add(1, Ordering::SeqCst);
        self.record("start");
        if self.fail_start {
            return Err(TransportError::start(&self.name, "mock start failure"));
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), TransportError> {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        self.record("stop");
        self.started.store(false, Ordering::SeqCst);
        if self.fail_stop {
            return Err(TransportError::stop(&self.name, "mock stop failure"));
        }
        Ok(())
    }

    fn send(&self, message: &Message) -> Result<usize, TransportError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        self.record("send");
        let behavior = *self.behavior.lock().unwrap_or_else(PoisonError::into_inner);
        match behavior {
            MockBehavior::Accept(count) => Ok(count),
            MockBehavior::AcceptAll => Ok(message.recipient_count()),
            MockBehavior::Fail => Err(TransportError::send(&self.name, "mock send failure")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_records_across_mocks() {
        let journal = CallJournal::new();
        let a = MockTransport::new("a", MockBehavior::Accept(1)).with_journal(&journal);
        let b = MockTransport::new("b", MockBehavior::Fail).with_journal(&journal);
        let msg = Message::new("m1", "x@example.com", vec![]);

        a.start().unwrap();
        a.send(&msg).unwrap();
        assert!(b.send(&msg).is_err());

        assert_eq!(journal.calls(), vec!["a.start", "a.send", "b.send"]);
        assert_eq!(journal.names_for("send"), vec!["a", "b"]);
    }

    #[test]
    fn test_set_behavior() {
        let mock = MockTransport::new("a", MockBehavior::Fail);
        let msg = Message::new("m1", "x@example.com", vec!["y@example.com".into()]);
        assert!(mock.send(&msg).is_err());
        mock.set_behavior(MockBehavior::AcceptAll);
        assert_eq!(mock.send(&msg).unwrap(), 1);
        assert_eq!(mock.send_count(), 2);
    }
}
