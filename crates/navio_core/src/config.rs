//! Core runtime configuration.
//!
//! # Responsibility
//! - Deserialize host-provided JSON configuration with defaults.
//! - Validate limits before they reach services.
//!
//! # Invariants
//! - Every field is optional in the JSON form.
//! - A validated config always has limits inside their documented ranges.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_RECENT_LIMIT: usize = 20;
pub const MAX_RECENT_LIMIT: usize = 100;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const MAX_SEARCH_LIMIT: usize = 20;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    OutOfRange {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::OutOfRange { field, value, max } => {
                write!(f, "`{field}` must be within 1..={max}, got {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Store file. `None` keeps state in memory only.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
    pub recent_limit: usize,
    pub search_limit: usize,
    pub write_legacy_flags: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
            write_legacy_flags: true,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("recent_limit", self.recent_limit, MAX_RECENT_LIMIT)?;
        check_range("search_limit", self.search_limit, MAX_SEARCH_LIMIT)?;
        Ok(())
    }
}

/// Reads, parses and validates a JSON config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<CoreConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CoreConfig::from_json_str(&raw)
}

fn check_range(field: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::OutOfRange { field, value, max });
    }
    Ok(())
}
