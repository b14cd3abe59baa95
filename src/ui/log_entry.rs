//! This module defines one line of the dashboard's own diagnostics.
use chrono::{DateTime, Utc};
use tracing::Level;

/// A tracing event captured for display in the status line.
#[derive(Debug, Clone)]
pub struct DiagnosticLine {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    /// The last component of the module path that emitted it.
    pub module: String,
    pub message: String,
}
