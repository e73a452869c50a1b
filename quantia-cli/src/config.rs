//! Environment configuration and extra-dimension loading

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use quantia_core::QuantityError;
use quantia_units::{DimensionDefinition, RegistrationWarning, UnitRegistry};
use thiserror::Error;
use tracing::{info, warn, Level};

pub const LOG_ENV: &str = "QUANTIA_LOG";
pub const UNITS_PATH_ENV: &str = "QUANTIA_UNITS_PATH";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: Level,
    pub units_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(env::var(LOG_ENV).ok().as_deref(), env::var_os(UNITS_PATH_ENV).map(PathBuf::from))
    }

    /// Unparseable levels fall back to `info`
    fn from_vars(log: Option<&str>, units_path: Option<PathBuf>) -> Self {
        let log_level = log
            .and_then(|s| Level::from_str(s.trim()).ok())
            .unwrap_or(Level::INFO);
        Config {
            log_level,
            units_path: units_path.filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dimension file '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of dimension definitions
pub fn read_dimensions(path: &Path) -> Result<Vec<DimensionDefinition>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Register each definition in order.
///
/// A rejected definition is logged and skipped; the others still register.
/// Returns the rejected definitions' errors.
pub fn register_dimensions(
    registry: &mut UnitRegistry,
    definitions: Vec<DimensionDefinition>,
) -> (Vec<RegistrationWarning>, Vec<QuantityError>) {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for definition in definitions {
        let name = definition.name.clone();
        match registry.define_dimension(definition) {
            Ok(w) => {
                info!(dimension = %name, "registered configured dimension");
                warnings.extend(w);
            }
            Err(e) => {
                warn!(dimension = %name, error = %e, "skipping configured dimension");
                errors.push(e);
            }
        }
    }

    (warnings, errors)
}
