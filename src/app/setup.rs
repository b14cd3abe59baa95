//! This module turns command-line arguments and the environment into
//! runtime configuration.
use super::args::{DashboardArgs, ServeArgs};
use crate::config::{
    DashboardOptions, ServerConfig, API_URL_ENV, DATABASE_ENV, DEFAULT_DATABASE,
};
use crate::storage::DatabaseTarget;
use anyhow::{Context, Result};

/// Resolves the server configuration. Flags win over the environment, which
/// wins over the defaults.
pub fn server_config(
    args: &ServeArgs,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ServerConfig> {
    let defaults = ServerConfig::default();
    let conn = args
        .database
        .clone()
        .or_else(|| env(DATABASE_ENV))
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
    let database = DatabaseTarget::parse(&conn)
        .with_context(|| format!("invalid database connection string `{}`", conn))?;

    Ok(ServerConfig {
        host: args.host.unwrap_or(defaults.host),
        port: args.port.unwrap_or(defaults.port),
        database,
    })
}

pub fn dashboard_options(
    args: &DashboardArgs,
    env: impl Fn(&str) -> Option<String>,
) -> DashboardOptions {
    let defaults = DashboardOptions::default();
    let categories = if args.no_categories {
        Vec::new()
    } else if args.categories.is_empty() {
        defaults.categories
    } else {
        args.categories.clone()
    };

    DashboardOptions {
        api_url: args
            .url
            .clone()
            .or_else(|| env(API_URL_ENV))
            .unwrap_or(defaults.api_url),
        grouping: !args.no_grouping,
        categories,
        default_metadata: args.metadata.iter().cloned().collect(),
    }
}

/// Reads a process environment variable, treating empty values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Prints a banner with startup information.
pub fn print_start_banner(config: &ServerConfig) {
    println!("🚀 Starting LoopLog");
    println!("Listening: http://{}/api/logs", config.addr());
    println!("Database: {}", config.database);
    println!();
}
