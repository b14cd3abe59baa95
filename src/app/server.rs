//! This module contains the entry point for running the log service.
use crate::config::ServerConfig;
use crate::storage::{open_database, SledLogStore};
use crate::web::LogServer;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Opens the database and serves `/api/logs` until a shutdown signal.
///
/// # Errors
///
/// Fails if the database cannot be opened or the address cannot be bound.
/// No requests are served in that case.
pub async fn run(config: ServerConfig) -> Result<()> {
    let db = open_database(&config.database)?;
    let store = Arc::new(SledLogStore::new(db)?);
    info!("Opened log store at {}", config.database);

    LogServer::new(store, config.addr()).run().await
}
