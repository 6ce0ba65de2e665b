//! EntryLog implementations
//!
//! `TracingLog` forwards entries to `tracing`; `MemoryLog` keeps them for
//! later inspection.

use std::sync::{Mutex, PoisonError};

use contracts::EntryLog;
use tracing::info;

/// Entry log that emits every entry as a tracing event
pub struct TracingLog {
    dispatcher: String,
}

impl TracingLog {
    pub fn new(dispatcher: impl Into<String>) -> Self {
        Self {
            dispatcher: dispatcher.into(),
        }
    }
}

impl EntryLog for TracingLog {
    fn add_entry(&self, entry: &str) {
        info!(dispatcher = %self.dispatcher, "{}", entry);
    }
}

/// Entry log that keeps entries in memory
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries recorded so far, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Forget all recorded entries
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Entries joined into one newline-separated block
    pub fn dump(&self) -> String {
        self.lock().join("\n")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntryLog for MemoryLog {
    fn add_entry(&self, entry: &str) {
        self.lock().push(entry.to_string());
    }
}
