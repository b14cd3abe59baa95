//! This module defines the storage interface for log entries and its `sled`
//! implementation, along with opening the database itself.
pub mod error;
pub mod logs;

pub use error::{LogStoreError, Result};
pub use logs::{LogStore, SledLogStore, MAX_LIST_ENTRIES};

use std::fmt;
use std::path::PathBuf;

/// Where the database lives, parsed from the connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// An on-disk database at the given directory.
    Path(PathBuf),
    /// A throwaway database removed when the handle is dropped.
    Temporary,
}

impl DatabaseTarget {
    /// Parses a connection string.
    ///
    /// Accepts `memory:`, `sled://<path>` or a bare filesystem path.
    pub fn parse(conn: &str) -> Result<Self> {
        let conn = conn.trim();
        if conn.is_empty() {
            return Err(LogStoreError::validation("database connection string is empty"));
        }
        if conn == "memory:" || conn == "memory" {
            return Ok(Self::Temporary);
        }
        let path = conn.strip_prefix("sled://").unwrap_or(conn);
        if path.is_empty() {
            return Err(LogStoreError::validation(format!(
                "database connection string `{}` has no path",
                conn
            )));
        }
        Ok(Self::Path(PathBuf::from(path)))
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Temporary => f.write_str("memory:"),
        }
    }
}

/// Opens the database handle. The caller owns its lifecycle.
pub fn open_database(target: &DatabaseTarget) -> Result<sled::Db> {
    let db = match target {
        DatabaseTarget::Path(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| LogStoreError::Unavailable(e.to_string()))?;
            }
            sled::open(path)?
        }
        DatabaseTarget::Temporary => sled::Config::new().temporary(true).open()?,
    };
    Ok(db)
}
