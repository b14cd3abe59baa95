//! This module provides a buffer for the dashboard's own diagnostics.
//!
//! While the dashboard owns the terminal nothing may be printed to stdout, so
//! tracing events are kept here and forwarded to the status line instead.
use crate::ui::{DiagnosticLine, UIEvent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::Level;

/// A bounded ring of recent diagnostics with an optional UI subscriber.
pub struct DiagnosticBuffer {
    entries: Arc<Mutex<VecDeque<DiagnosticLine>>>,
    max_size: usize,
    ui_sender: Arc<Mutex<Option<mpsc::UnboundedSender<UIEvent>>>>,
    /// Least severe level forwarded to the UI.
    display_level: Level,
}

impl DiagnosticBuffer {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(max_size))),
            max_size,
            ui_sender: Arc::new(Mutex::new(None)),
            display_level: Level::INFO,
        }
    }

    pub fn set_ui_sender(&self, sender: mpsc::UnboundedSender<UIEvent>) {
        if let Ok(mut slot) = self.ui_sender.lock() {
            *slot = Some(sender);
        }
    }

    /// Stores `line` and forwards it to the UI if it is severe enough.
    pub fn add_entry(&self, line: DiagnosticLine) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= self.max_size {
                entries.pop_front();
            }
            entries.push_back(line.clone());
        }

        if line.level > self.display_level {
            return;
        }

        if let Ok(mut slot) = self.ui_sender.lock() {
            let closed = match slot.as_ref() {
                Some(sender) => sender.send(UIEvent::Diagnostic(line)).is_err(),
                None => false,
            };
            if closed {
                *slot = None;
            }
        }
    }

    /// A copy of the stored lines, oldest first.
    pub fn snapshot(&self) -> Vec<DiagnosticLine> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}
