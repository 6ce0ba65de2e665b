//! `info` command implementation.

use std::collections::HashMap;

use anyhow::{Context, Result};
use contracts::RelayBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    dispatcher: String,
    journal: String,
    transports: Vec<TransportInfo>,
}

#[derive(Serialize)]
struct TransportInfo {
    position: usize,
    name: String,
    transport_type: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    params: HashMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(&args.config).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?
        .blueprint;

    let info = build_config_info(&blueprint, args);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(blueprint: &RelayBlueprint, args: &InfoArgs) -> ConfigInfo {
    let transports = blueprint
        .transports
        .iter()
        .enumerate()
        .map(|(position, t)| TransportInfo {
            position,
            name: t.name.clone(),
            transport_type: format!("{:?}", t.transport_type),
            params: if args.params {
                t.params.clone()
            } else {
                HashMap::new()
            },
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        dispatcher: blueprint.dispatcher.name.clone(),
        journal: format!("{:?}", blueprint.dispatcher.journal),
        transports,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("Dispatcher: {} ({})", info.dispatcher, info.version);
    println!("  Journal: {}", info.journal);
    println!("\nTransports in rotation order ({})", info.transports.len());
    for (i, transport) in info.transports.iter().enumerate() {
        let prefix = if i == info.transports.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!(
            "  {} [{}] {} ({})",
            prefix, transport.position, transport.name, transport.transport_type
        );

        let mut params: Vec<_> = transport.params.iter().collect();
        params.sort();
        for (key, value) in params {
            println!("        {} = {}", key, value);
        }
    }
}
