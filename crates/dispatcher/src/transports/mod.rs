//! Transport implementations
//!
//! Contains LogTransport, FileTransport, NullTransport and the MockTransport
//! used to script failures in tests.

mod file;
mod log;
mod mock;
mod null;

pub use self::file::{FileTransport, FileTransportConfig};
pub use self::log::LogTransport;
pub use self::mock::{CallJournal, MockBehavior, MockTransport};
pub use self::null::NullTransport;
