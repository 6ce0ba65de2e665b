//! # Rotary CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Blueprint loading and validation
//! - Message delivery through a rotating dispatcher
//! - Transport listing

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_send, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Rotary CLI starting");

    let result = match &cli.command {
        Commands::Send(args) => run_send(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// The metrics endpoint is left to `send --metrics-port`.
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(observability_config(cli))
}

fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        default_log_level: level.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observability_config_from_flags() {
        let cli = Cli::parse_from(["rotary", "-vv", "--log-format", "pretty", "info", "-c", "r.toml"]);
        let config = observability_config(&cli);
        assert_eq!(config.default_log_level, "trace");
        assert_eq!(config.log_format, observability::LogFormat::Pretty);
        assert_eq!(config.metrics_port, None);

        let cli = Cli::parse_from(["rotary", "-q", "info", "-c", "r.toml"]);
        assert_eq!(observability_config(&cli).default_log_level, "warn");
    }
}
