//! Dispatcher counters for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total dispatch calls
    dispatch_count: AtomicU64,
    /// Total rotations (one per transport tried)
    rotation_count: AtomicU64,
    /// Total transports moved into quarantine
    quarantine_count: AtomicU64,
    /// Total dispatch calls that ended with no transport left
    exhausted_count: AtomicU64,
    /// Total recipients accepted across all dispatches
    accepted_recipients: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count.load(Ordering::Relaxed)
    }

    pub fn inc_dispatch_count(&self) {
        self.dispatch_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rotation_count(&self) -> u64 {
        self.rotation_count.load(Ordering::Relaxed)
    }

    pub fn inc_rotation_count(&self) {
        self.rotation_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn quarantine_count(&self) -> u64 {
        self.quarantine_count.load(Ordering::Relaxed)
    }

    pub fn inc_quarantine_count(&self) {
        self.quarantine_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn exhausted_count(&self) -> u64 {
        self.exhausted_count.load(Ordering::Relaxed)
    }

    pub fn inc_exhausted_count(&self) {
        self.exhausted_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn accepted_recipients(&self) -> u64 {
        self.accepted_recipients.load(Ordering::Relaxed)
    }

    /// Add to the accepted recipient total
    pub fn add_accepted_recipients(&self, count: usize) {
        self.accepted_recipients
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatch_count: self.dispatch_count(),
            rotation_count: self.rotation_count(),
            quarantine_count: self.quarantine_count(),
            exhausted_count: self.exhausted_count(),
            accepted_recipients: self.accepted_recipients(),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub dispatch_count: u64,
    pub rotation_count: u64,
    pub quarantine_count: u64,
    pub exhausted_count: u64,
    pub accepted_recipients: u64,
}
