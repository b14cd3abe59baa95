//! This module defines the requests the dashboard hands to its action worker.
use crate::types::{LogDraft, LogFilter, LogPatch};
use uuid::Uuid;

/// A request chain. Every mutation is followed by a fetch with `filter`.
#[derive(Debug, Clone, PartialEq)]
pub enum UIAction {
    /// Replaces the local list with a fresh listing.
    Fetch(LogFilter),
    Create { draft: LogDraft, filter: LogFilter },
    Update { id: Uuid, patch: LogPatch, filter: LogFilter },
    Delete { id: Uuid, filter: LogFilter },
}
