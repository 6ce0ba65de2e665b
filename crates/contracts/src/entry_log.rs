//! EntryLog trait - dispatcher log collaborator

/// Receives free-form dispatcher log entries
///
/// Fire-and-forget: implementations must not fail observably.
pub trait EntryLog: Send + Sync {
    /// Append one entry
    fn add_entry(&self, entry: &str);
}
