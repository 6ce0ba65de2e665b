//! Message - the unit of work handed to transports
//!
//! The dispatcher never inspects a message; it is passed through unmodified.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A message to be delivered by one transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Caller-assigned identifier (used for logging/diagnostics)
    pub id: String,

    /// Sender address
    pub from: String,

    /// Recipient addresses
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Subject line
    #[serde(default)]
    pub subject: String,

    /// Raw body
    #[serde(default)]
    pub body: Bytes,
}

impl Message {
    /// Create a message with an empty subject and body
    pub fn new(id: impl Into<String>, from: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            recipients,
            subject: String::new(),
            body: Bytes::new(),
        }
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Number of recipients addressed
    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }
}
