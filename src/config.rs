//! Runtime configuration for the server and the dashboard.
//!
//! Values come from the command line first, then the environment (after
//! loading any `.env` file), then the defaults below.
use crate::client::DEFAULT_API_URL;
use crate::storage::DatabaseTarget;
use crate::types::Metadata;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Environment variable holding the database connection string.
pub const DATABASE_ENV: &str = "LOOPLOG_DATABASE";

/// Environment variable holding the dashboard's API URL.
pub const API_URL_ENV: &str = "LOOPLOG_API_URL";

pub const DEFAULT_DATABASE: &str = "data/looplog.db";

pub const DEFAULT_PORT: u16 = 5001;

/// Configuration for `looplog serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseTarget,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            database: DatabaseTarget::Path(DEFAULT_DATABASE.into()),
        }
    }
}

/// Configuration for `looplog dashboard`.
///
/// Grouping and categories are optional features of the single client.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    /// The `/api/logs` collection URL.
    pub api_url: String,
    /// Whether the group mode can leave `none`.
    pub grouping: bool,
    /// Category labels offered in the draft. Empty disables categories.
    pub categories: Vec<String>,
    /// Metadata attached to every created entry.
    pub default_metadata: Metadata,
}

impl DashboardOptions {
    pub fn categories_enabled(&self) -> bool {
        !self.categories.is_empty()
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            grouping: true,
            categories: ["general", "work", "personal", "social"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_metadata: Metadata::new(),
        }
    }
}

/// Parses a `key=value` metadata pair. Values that parse as JSON keep their
/// JSON type; anything else is stored as a string.
pub fn parse_metadata_pair(pair: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", pair))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty metadata key in `{}`", pair));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
