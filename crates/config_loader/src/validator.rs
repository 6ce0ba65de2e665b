//! Configuration validation
//!
//! Rules:
//! - field-level rules declared on the blueprint types (non-empty names)
//! - transport names are unique
//! - every transport carries the params its type requires
//!
//! Warnings flag blueprints that load but cannot fail over or never deliver.

use std::collections::{HashMap, HashSet};
use std::fmt;

use ::validator::Validate;
use contracts::{ContractError, RelayBlueprint, TransportType};

/// Non-fatal finding about a valid blueprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Every dispatch fails with an empty working set
    NoTransports,
    /// Dispatch succeeds but no recipient is ever accepted
    OnlyNullTransports,
    /// Nothing to fail over to
    SingleTransport,
    /// Several file transports append to one spool
    SharedSpoolPath { path: String, transports: Vec<String> },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTransports => write!(f, "No transports configured - every dispatch will fail"),
            Self::OnlyNullTransports => write!(
                f,
                "Only null transports configured - no recipient will ever be accepted"
            ),
            Self::SingleTransport => {
                write!(f, "Single transport configured - no failover is possible")
            }
            Self::SharedSpoolPath { path, transports } => write!(
                f,
                "File transports {} share spool '{}' - a failure of one disables the same target",
                transports.join(", "),
                path
            ),
        }
    }
}

/// Validate a RelayBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &RelayBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_transport_names(blueprint)?;
    validate_transport_params(blueprint)?;
    Ok(())
}

/// Field-level rules from the `Validate` derive
fn validate_fields(blueprint: &RelayBlueprint) -> Result<(), ContractError> {
    blueprint.validate().map_err(|errors| {
        let message = errors.to_string();
        ContractError::config_validation("blueprint", message)
    })
}

/// Transport names must be unique
fn validate_transport_names(blueprint: &RelayBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for transport in &blueprint.transports {
        if !seen.insert(&transport.name) {
            return Err(ContractError::config_validation(
                format!("transports[name={}]", transport.name),
                "duplicate transport name",
            ));
        }
    }
    Ok(())
}

fn validate_transport_params(blueprint: &RelayBlueprint) -> Result<(), ContractError> {
    for (idx, transport) in blueprint.transports.iter().enumerate() {
        for param in transport.transport_type.required_params() {
            let present = transport
                .params
                .get(*param)
                .is_some_and(|value| !value.trim().is_empty());
            if !present {
                return Err(ContractError::config_validation(
                    format!("transports[{}].params.{}", idx, param),
                    format!(
                        "{:?} transport '{}' requires param '{}'",
                        transport.transport_type, transport.name, param
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Collect warnings for a blueprint that already passed [`validate`]
pub fn collect_warnings(blueprint: &RelayBlueprint) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let transports = &blueprint.transports;

    if transports.is_empty() {
        warnings.push(ConfigWarning::NoTransports);
        return warnings;
    }

    if transports
        .iter()
        .all(|t| t.transport_type == TransportType::Null)
    {
        warnings.push(ConfigWarning::OnlyNullTransports);
    }

    if transports.len() == 1 {
        warnings.push(ConfigWarning::SingleTransport);
    }

    let mut spools: Vec<(&str, Vec<String>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for transport in transports
        .iter()
        .filter(|t| t.transport_type == TransportType::File)
    {
        let Some(path) = transport.params.get("path") else {
            continue;
        };
        let slot = *index.entry(path.trim()).or_insert_with(|| {
            spools.push((path.trim(), Vec::new()));
            spools.len() - 1
        });
        spools[slot].1.push(transport.name.clone());
    }
    warnings.extend(
        spools
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(path, transports)| ConfigWarning::SharedSpoolPath {
                path: path.to_string(),
                transports,
            }),
    );

    warnings
}
