//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Collaborators
//! - [`Transport`]: a backend capable of delivering a [`Message`]
//! - [`EntryLog`]: receives human-readable dispatcher log entries
//! - [`RelayBlueprint`]: configuration describing which transports to load

mod blueprint;
mod entry_log;
mod error;
mod message;
mod transport;

pub use blueprint::*;
pub use entry_log::EntryLog;
pub use error::*;
pub use message::Message;
pub use transport::{SharedTransport, Transport};
