//! `send` command implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::{EntryLog, JournalKind, Message};
use dispatcher::{DispatcherBuilder, MemoryLog, RotatingDispatcher};
use observability::DispatchStats;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::SendArgs;
use crate::error::{self, CliError};

/// Dispatch report for JSON output
#[derive(Serialize)]
struct SendReport {
    dispatcher: String,
    messages: Vec<MessageReport>,
    working: Vec<String>,
    quarantined: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    journal: Vec<String>,
}

#[derive(Serialize)]
struct MessageReport {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Transports this message sent to quarantine
    #[serde(skip_serializing_if = "Vec::is_empty")]
    quarantined: Vec<String>,
}

/// Everything a `send` run produced, before it is printed
struct SendOutcome {
    report: SendReport,
    stats: DispatchStats,
    /// First message that exhausted the working set
    failure: Option<CliError>,
}

/// Execute the `send` command
pub fn run_send(args: &SendArgs) -> Result<()> {
    let SendOutcome {
        report,
        stats,
        failure,
    } = execute_send(args)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize send report")?;
        println!("{}", json);
    } else {
        print_send_report(&report, &stats);
    }

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Build the dispatcher, send every message, then stop the working set
fn execute_send(args: &SendArgs) -> Result<SendOutcome> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let loaded = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    for warning in &loaded.warnings {
        warn!(%warning, "Configuration warning");
    }
    let blueprint = loaded.blueprint;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let messages = args
        .messages
        .iter()
        .map(|path| load_message(path))
        .collect::<error::Result<Vec<_>>>()?;

    let memory_log = (blueprint.dispatcher.journal == JournalKind::Memory)
        .then(|| Arc::new(MemoryLog::new()));

    let mut builder = DispatcherBuilder::new(blueprint.dispatcher, blueprint.transports);
    if let Some(log) = &memory_log {
        builder = builder.with_log(Arc::clone(log) as Arc<dyn EntryLog>);
    }
    let mut dispatcher = builder.build().context("Failed to build dispatcher")?;

    info!(
        dispatcher = %dispatcher.name(),
        transports = dispatcher.all().len(),
        messages = messages.len(),
        "Dispatcher ready"
    );

    let mut stats = DispatchStats::new();
    let mut reports = Vec::with_capacity(messages.len());
    let mut failure = None;

    for message in &messages {
        if args.reactivate {
            dispatcher.activate();
        }

        let (result, quarantined) = dispatch_recorded(&mut dispatcher, message);
        let accepted = result.as_ref().ok().copied();
        stats.update(accepted);

        let error = match result {
            Ok(_) => None,
            Err(e) => {
                let text = e.to_string();
                if failure.is_none() {
                    failure = Some(CliError::dispatch(&message.id, e));
                }
                Some(text)
            }
        };
        reports.push(MessageReport {
            id: message.id.clone(),
            accepted,
            error,
            quarantined,
        });
    }

    if let Err(e) = dispatcher.deactivate() {
        warn!(error = %e, "Failed to stop transports");
    }

    let report = SendReport {
        dispatcher: dispatcher.name().to_string(),
        messages: reports,
        working: dispatcher.working_names(),
        quarantined: dispatcher.quarantined_names(),
        journal: memory_log.map(|log| log.entries()).unwrap_or_default(),
    };

    Ok(SendOutcome {
        report,
        stats,
        failure,
    })
}

/// Dispatch one message and publish its metrics
///
/// Also returns the names of the transports quarantined by this dispatch.
fn dispatch_recorded(
    dispatcher: &mut RotatingDispatcher,
    message: &Message,
) -> (
    std::result::Result<usize, dispatcher::DispatcherError>,
    Vec<String>,
) {
    let name = dispatcher.name().to_string();
    let rotations_before = dispatcher.metrics().rotation_count();
    let quarantined_before = dispatcher.quarantined_names().len();

    let result = dispatcher.dispatch(message);

    observability::record_transport_switched(
        &name,
        dispatcher.metrics().rotation_count() - rotations_before,
    );
    let quarantined: Vec<String> = dispatcher
        .quarantined_names()
        .into_iter()
        .skip(quarantined_before)
        .collect();
    for transport in &quarantined {
        observability::record_transport_quarantined(&name, transport);
    }
    observability::record_dispatch_outcome(&name, result.as_ref().ok().copied());
    observability::record_pool_sizes(
        &name,
        dispatcher.working_names().len(),
        dispatcher.quarantined_names().len(),
    );

    (result, quarantined)
}

fn load_message(path: &Path) -> error::Result<Message> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::message_load(path, e.to_string()))
}

fn print_send_report(report: &SendReport, stats: &DispatchStats) {
    println!("Dispatcher: {}", report.dispatcher);
    for message in &report.messages {
        match (&message.accepted, &message.error) {
            (Some(count), _) => println!("  ✓ {} accepted by {} recipient(s)", message.id, count),
            (None, Some(error)) => println!("  ✗ {} failed: {}", message.id, error),
            (None, None) => println!("  ? {}", message.id),
        }
        if !message.quarantined.is_empty() {
            println!("      quarantined: {}", message.quarantined.join(", "));
        }
    }

    println!("\nWorking transports: {}", report.working.join(", "));
    if !report.quarantined.is_empty() {
        println!("Quarantined transports: {}", report.quarantined.join(", "));
    }

    if !report.journal.is_empty() {
        println!("\nJournal:");
        for entry in &report.journal {
            println!("  {}", entry);
        }
    }

    println!("\n{}", stats);
}
