//! # Config Loader
//!
//! Reads a relay blueprint (the list of transports a dispatcher rotates over)
//! from TOML or JSON and checks it before any transport is built.
//!
//! Loading has two outcomes besides I/O failure:
//! - a hard [`ContractError`] when the blueprint cannot be used at all
//!   (syntax error, unknown transport type, duplicate names, missing params)
//! - a [`LoadedConfig`] carrying the blueprint plus [`ConfigWarning`]s for
//!   setups that load fine but cannot fail over or never deliver
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let loaded = ConfigLoader::load_from_path(Path::new("relay.toml")).unwrap();
//! for warning in &loaded.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! println!("Transports: {}", loaded.blueprint.transports.len());
//! ```

mod validator;

pub use contracts::RelayBlueprint;
pub use validator::ConfigWarning;

use contracts::ContractError;
use std::path::Path;

/// Blueprint file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> Result<RelayBlueprint, ContractError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("TOML parse error: {e}"),
                source: Some(Box::new(e)),
            }),
            Self::Json => serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("JSON parse error: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }
}

/// A blueprint that passed validation, with its non-fatal findings
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub blueprint: RelayBlueprint,
    pub warnings: Vec<ConfigWarning>,
}

impl LoadedConfig {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Blueprint loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a blueprint file, detecting the format from its extension
    ///
    /// # Errors
    /// - Missing or unsupported extension
    /// - File read failure
    /// - Parse or validation failure
    pub fn load_from_path(path: &Path) -> Result<LoadedConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load a blueprint from a string
    ///
    /// # Errors
    /// Parse or validation failure.
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<LoadedConfig, ContractError> {
        let blueprint = format.parse(content)?;
        validator::validate(&blueprint)?;
        let warnings = validator::collect_warnings(&blueprint);
        Ok(LoadedConfig {
            blueprint,
            warnings,
        })
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}
