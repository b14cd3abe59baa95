//! This module defines the HTTP API endpoints for log entries.
use super::error::ApiError;
use crate::storage::LogStore;
use crate::types::{LogDraft, LogEntry, LogFilter, LogPatch, LogType};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared handler state: the injected store.
pub type AppState = Arc<dyn LogStore>;

/// Query parameters for listing entries.
#[derive(Deserialize, Default)]
pub struct ListQuery {
    /// Restricts the listing to one type. Empty means no restriction.
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Response body for a successful delete.
#[derive(Serialize)]
pub struct DeletedResponse {
    message: &'static str,
}

/// Ids that do not parse cannot name a stored entry.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        debug!("Unparseable log id `{}`", raw);
        ApiError::NotFound
    })
}

/// Lists the newest entries, optionally restricted to one type.
#[axum::debug_handler]
pub async fn list_logs(
    State(store): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let filter = match query.kind.as_deref().filter(|k| !k.is_empty()) {
        None => LogFilter::all(),
        Some(raw) => match raw.parse::<LogType>() {
            Ok(kind) => LogFilter::of(kind),
            // Nothing is ever stored under an unknown type.
            Err(_) => return Ok(Json(Vec::new())),
        },
    };

    let entries = store.list(filter).await?;
    debug!("Listed {} logs", entries.len());
    Ok(Json(entries))
}

/// Creates a new entry.
#[axum::debug_handler]
pub async fn create_log(
    State(store): State<AppState>,
    payload: Result<Json<LogDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = payload?;
    let entry = store.create(draft).await?;
    info!("Created {} log {}", entry.kind, entry.id);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Applies a partial update to an entry.
#[axum::debug_handler]
pub async fn update_log(
    State(store): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LogPatch>, JsonRejection>,
) -> Result<Json<LogEntry>, ApiError> {
    let id = parse_id(&id)?;
    // An unknown id is reported even when the body is unusable.
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            if store.exists(&id).await? {
                return Err(rejection.into());
            }
            return Err(ApiError::NotFound);
        }
    };
    let entry = store.update_by_id(&id, patch).await?;
    info!("Updated log {}", entry.id);
    Ok(Json(entry))
}

/// Deletes an entry.
#[axum::debug_handler]
pub async fn delete_log(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id)?;
    store.delete_by_id(&id).await?;
    info!("Deleted log {}", id);
    Ok(Json(DeletedResponse { message: "deleted" }))
}

/// Liveness probe.
pub async fn healthy() -> &'static str {
    "OK"
}
