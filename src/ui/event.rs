use crate::types::LogEntry;
use crossterm::event::KeyEvent;

use super::log_entry::DiagnosticLine;

/// Completed mutations, reported before the follow-up fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug)]
pub enum UIEvent {
    /// A fetch succeeded; replaces the local cache.
    LogsLoaded(Vec<LogEntry>),
    /// A create, update or delete succeeded.
    Mutated(Mutation),
    /// Any request in a chain failed.
    RequestFailed(String),
    Diagnostic(DiagnosticLine),
    KeyPress(KeyEvent),
    Resize(u16, u16),
}
