//! RelayBlueprint - Config Loader output
//!
//! Describes the dispatcher settings and the ordered list of transports to load.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete relay configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RelayBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Dispatcher settings
    #[serde(default)]
    #[validate(nested)]
    pub dispatcher: DispatcherSettings,

    /// Transports in rotation order
    #[serde(default)]
    #[validate(nested)]
    pub transports: Vec<TransportConfig>,
}

/// Dispatcher settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DispatcherSettings {
    /// Dispatcher name (attached to log entries)
    #[serde(default = "default_dispatcher_name")]
    #[validate(length(min = 1, message = "dispatcher name cannot be empty"))]
    pub name: String,

    /// Where dispatcher log entries go
    #[serde(default)]
    pub journal: JournalKind,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            name: default_dispatcher_name(),
            journal: JournalKind::default(),
        }
    }
}

fn default_dispatcher_name() -> String {
    "rotary".to_string()
}

/// Entry log backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    /// Forward entries to `tracing`
    #[default]
    Tracing,
    /// Keep entries in memory
    Memory,
}

/// Single transport definition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransportConfig {
    /// Transport name
    #[validate(length(min = 1, message = "transport name cannot be empty"))]
    pub name: String,

    /// Transport type
    pub transport_type: TransportType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Transport type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    /// Log every message via tracing
    Log,
    /// Spool messages to a JSON-lines file
    File,
    /// Accept nothing
    Null,
}

impl TransportType {
    /// Parameters that must be present for this type
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Self::File => &["path"],
            Self::Log | Self::Null => &[],
        }
    }
}
