//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Translate `DATABASE_URI` into a concrete SQLite target.
//! - Resolve logging level and optional log directory.
//!
//! # Invariants
//! - Only `sqlite` URIs (or the literal `:memory:`) are accepted.
//! - Resolution never touches the filesystem.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_URI_VAR: &str = "DATABASE_URI";
pub const LOG_LEVEL_VAR: &str = "ACCOUNTS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "ACCOUNTS_LOG_DIR";
pub const DEFAULT_DATABASE_URI: &str = "sqlite:///test.db";

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY_MARKER: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedScheme(String),
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedScheme(uri) => write!(
                f,
                "unsupported database uri `{uri}`; expected sqlite:///<path> or :memory:"
            ),
            Self::EmptyValue(key) => write!(f, "environment variable {key} is set but empty"),
        }
    }
}

impl Error for ConfigError {}

/// Where account storage lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl DatabaseTarget {
    /// Parses a SQLAlchemy-style sqlite URI.
    ///
    /// `sqlite:///rel.db` is relative, `sqlite:////abs.db` is absolute,
    /// `sqlite://` and `sqlite://:memory:` are in-memory.
    pub fn parse(uri: &str) -> Result<Self, ConfigError> {
        let trimmed = uri.trim();
        if trimmed == MEMORY_MARKER {
            return Ok(Self::Memory);
        }

        let rest = trimmed
            .strip_prefix(SQLITE_SCHEME)
            .ok_or_else(|| ConfigError::UnsupportedScheme(trimmed.to_string()))?;
        if rest.is_empty() || rest == MEMORY_MARKER {
            return Ok(Self::Memory);
        }

        match rest.strip_prefix('/') {
            Some(path) if !path.is_empty() && path != MEMORY_MARKER => {
                Ok(Self::File(PathBuf::from(path)))
            }
            Some(_) => Ok(Self::Memory),
            // `sqlite://host/...` carries an authority, which sqlite has no use for.
            None => Err(ConfigError::UnsupportedScheme(trimmed.to_string())),
        }
    }
}

/// Resolved configuration for core callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub database: DatabaseTarget,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves configuration from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// - `UnsupportedScheme` for non-sqlite database URIs.
    /// - `EmptyValue` when a variable is present but blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_uri = non_empty(&lookup, DATABASE_URI_VAR)?
            .unwrap_or_else(|| DEFAULT_DATABASE_URI.to_string());
        let log_level = non_empty(&lookup, LOG_LEVEL_VAR)?
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = non_empty(&lookup, LOG_DIR_VAR)?.map(PathBuf::from);

        Ok(Self {
            database: DatabaseTarget::parse(&database_uri)?,
            log_level,
            log_dir,
        })
    }
}

fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<String>, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(key)),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}
