//! RotatingDispatcher - round-robin delegation over interchangeable transports
//!
//! The working set is a ring: each attempt moves the front transport to the
//! back and uses it. A transport that fails is popped off the back (where the
//! rotation just put it) and parked in quarantine until `activate`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument, warn};

use contracts::{
    DispatcherSettings, EntryLog, JournalKind, Message, RelayBlueprint, SharedTransport,
    TransportConfig, TransportError, TransportType,
};

use crate::entry_log::{MemoryLog, TracingLog};
use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;
use crate::transports::{FileTransport, LogTransport, NullTransport};

/// Dispatcher shared between callers
///
/// Rotation mutates ordered state, so concurrent callers must serialize every
/// operation through the mutex.
pub type SharedDispatcher = Arc<Mutex<RotatingDispatcher>>;

/// Builder for creating a RotatingDispatcher from configuration
pub struct DispatcherBuilder {
    settings: DispatcherSettings,
    transports: Vec<TransportConfig>,
    log: Option<Arc<dyn EntryLog>>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(settings: DispatcherSettings, transports: Vec<TransportConfig>) -> Self {
        Self {
            settings,
            transports,
            log: None,
        }
    }

    /// Use `log` instead of the journal named in the settings
    pub fn with_log(mut self, log: Arc<dyn EntryLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Build the dispatcher and load the configured transports
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(dispatcher = %self.settings.name, transport_count = self.transports.len())
    )]
    pub fn build(self) -> Result<RotatingDispatcher, DispatcherError> {
        let transports = self
            .transports
            .iter()
            .map(create_transport)
            .collect::<Result<Vec<_>, _>>()?;

        let log = self.log.unwrap_or_else(|| match self.settings.journal {
            JournalKind::Tracing => {
                Arc::new(TracingLog::new(&self.settings.name)) as Arc<dyn EntryLog>
            }
            JournalKind::Memory => Arc::new(MemoryLog::new()) as Arc<dyn EntryLog>,
        });

        let mut dispatcher = RotatingDispatcher::new(self.settings.name, log);
        dispatcher.configure(transports);
        Ok(dispatcher)
    }
}

/// Create a transport handle from configuration
#[instrument(
    name = "dispatcher_create_transport",
    skip(config),
    fields(transport = %config.name, transport_type = ?config.transport_type)
)]
pub fn create_transport(config: &TransportConfig) -> Result<SharedTransport, DispatcherError> {
    match config.transport_type {
        TransportType::Log => Ok(Arc::new(LogTransport::new(&config.name))),
        TransportType::File => {
            let transport = FileTransport::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::transport_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(transport))
        }
        TransportType::Null => Ok(Arc::new(NullTransport::new(&config.name))),
    }
}

/// Load-balancing dispatcher
///
/// Holds an ordered working set and a quarantine set. A handle is in exactly
/// one of them at any time. The dispatcher is "active" iff the working set is
/// non-empty.
pub struct RotatingDispatcher {
    name: String,
    working: VecDeque<SharedTransport>,
    quarantine: Vec<SharedTransport>,
    log: Arc<dyn EntryLog>,
    metrics: DispatchMetrics,
}

impl RotatingDispatcher {
    /// Create an empty dispatcher that writes entries to `log`
    pub fn new(name: impl Into<String>, log: Arc<dyn EntryLog>) -> Self {
        Self {
            name: name.into(),
            working: VecDeque::new(),
            quarantine: Vec::new(),
            log,
            metrics: DispatchMetrics::new(),
        }
    }

    /// Dispatcher name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counters accumulated over the dispatcher's lifetime
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Replace the working set with `transports` and discard the quarantine
    pub fn configure(&mut self, transports: Vec<SharedTransport>) {
        self.log
            .add_entry(&format!("++ {} Transports loaded", transports.len()));
        self.working = transports.into();
        self.quarantine.clear();
    }

    /// Working set followed by the quarantine set
    pub fn all(&self) -> Vec<SharedTransport> {
        self.working
            .iter()
            .chain(self.quarantine.iter())
            .cloned()
            .collect()
    }

    /// Names of the working set, in rotation order
    pub fn working_names(&self) -> Vec<String> {
        self.working.iter().map(|t| t.name().to_string()).collect()
    }

    /// Names of the quarantine set, in the order transports were disabled
    pub fn quarantined_names(&self) -> Vec<String> {
        self.quarantine.iter().map(|t| t.name().to_string()).collect()
    }

    /// True iff at least one transport is eligible for rotation
    pub fn is_active(&self) -> bool {
        !self.working.is_empty()
    }

    /// Return quarantined transports to the back of the working set
    ///
    /// Transports are not started here; `dispatch` starts them lazily.
    #[instrument(name = "dispatcher_activate", skip(self), fields(dispatcher = %self.name))]
    pub fn activate(&mut self) {
        if !self.quarantine.is_empty() {
            info!(
                revived = self.quarantine.len(),
                "Returning quarantined transports to rotation"
            );
        }
        self.working.extend(self.quarantine.drain(..));
    }

    /// Stop every transport in the working set, in order
    ///
    /// # Errors
    /// The first `stop` failure is returned immediately; later transports are
    /// not stopped.
    #[instrument(name = "dispatcher_deactivate", skip(self), fields(dispatcher = %self.name))]
    pub fn deactivate(&mut self) -> Result<(), DispatcherError> {
        self.log.add_entry("++ Stopping all Transports");
        for transport in &self.working {
            transport.stop()?;
        }
        Ok(())
    }

    /// Deliver `message` through the next working transport
    ///
    /// Tries at most as many transports as the working set held when the call
    /// began, quarantining each one that fails. Returns the accepted recipient
    /// count of the first transport that accepted anyone, or 0 if every
    /// surviving transport accepted nobody.
    ///
    /// # Errors
    /// [`DispatcherError::AllTransportsFailed`] when the working set is empty
    /// after the rotation loop.
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, message),
        fields(dispatcher = %self.name, message_id = %message.id)
    )]
    pub fn dispatch(&mut self, message: &Message) -> Result<usize, DispatcherError> {
        self.metrics.inc_dispatch_count();

        // Bound is fixed at the starting size; quarantines do not shrink it.
        let max_attempts = self.working.len();
        let mut sent = 0;

        for _ in 0..max_attempts {
            let Some(current) = self.rotate() else {
                break;
            };

            match Self::attempt(&current, message) {
                Ok(0) => {
                    sent = 0;
                    debug!(transport = %current.name(), "Transport accepted no recipients");
                }
                Ok(accepted) => {
                    sent = accepted;
                    break;
                }
                Err(e) => {
                    warn!(transport = %current.name(), error = %e, "Transport failed");
                    if let Some(Err(stop_error)) = self.quarantine_current() {
                        debug!(
                            transport = %current.name(),
                            error = %stop_error,
                            "Ignoring stop failure during quarantine"
                        );
                    }
                }
            }
        }

        if self.working.is_empty() {
            self.metrics.inc_exhausted_count();
            return Err(DispatcherError::AllTransportsFailed);
        }

        self.metrics.add_accepted_recipients(sent);
        Ok(sent)
    }

    /// Move the front transport to the back and return it
    fn rotate(&mut self) -> Option<SharedTransport> {
        let next = self.working.pop_front()?;
        self.log.add_entry(&format!(
            "++ Switched to Transport of kind {}",
            next.kind()
        ));
        self.metrics.inc_rotation_count();
        self.working.push_back(Arc::clone(&next));
        Some(next)
    }

    fn attempt(transport: &SharedTransport, message: &Message) -> Result<usize, TransportError> {
        if !transport.is_started() {
            transport.start()?;
        }
        transport.send(message)
    }

    /// Pop the just-rotated transport off the back and quarantine it
    ///
    /// Returns the outcome of the best-effort `stop`, which callers discard,
    /// or `None` when the working set was already empty.
    fn quarantine_current(&mut self) -> Option<Result<(), TransportError>> {
        let transport = self.working.pop_back()?;
        let stopped = transport.stop();
        self.log.add_entry(&format!(
            "!! Transport of kind {} deemed useless; disabling",
            transport.kind()
        ));
        self.metrics.inc_quarantine_count();
        self.quarantine.push(transport);
        Some(stopped)
    }
}

/// Convenience function to create a dispatcher from a blueprint
#[instrument(name = "dispatcher_create", skip(blueprint))]
pub fn create_dispatcher(blueprint: &RelayBlueprint) -> Result<RotatingDispatcher, DispatcherError> {
    DispatcherBuilder::new(blueprint.dispatcher.clone(), blueprint.transports.clone()).build()
}
