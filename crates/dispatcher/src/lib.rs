//! # Dispatcher
//!
//! Load-balancing message dispatch.
//!
//! Responsibilities:
//! - Rotate round-robin through a working set of transports
//! - Retry the next transport when one fails
//! - Quarantine failed transports until explicitly reactivated

pub mod balanced;
pub mod dispatcher;
pub mod entry_log;
pub mod error;
pub mod metrics;
pub mod transports;

pub use balanced::BalancedTransport;
pub use contracts::{EntryLog, Message, SharedTransport, Transport, TransportError};
pub use dispatcher::{
    create_dispatcher, create_transport, DispatcherBuilder, RotatingDispatcher, SharedDispatcher,
};
pub use entry_log::{MemoryLog, TracingLog};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use transports::{
    CallJournal, FileTransport, LogTransport, MockBehavior, MockTransport, NullTransport,
};
