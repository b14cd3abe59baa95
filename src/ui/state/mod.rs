mod draft;
mod logs;

pub use draft::Draft;

use std::collections::VecDeque;

use serde_json::Value;
use uuid::Uuid;

use crate::config::DashboardOptions;
use crate::types::{LogDraft, LogEntry, LogFilter, LogPatch, LogType, Metadata, CATEGORY_KEY};

use super::{log_entry::DiagnosticLine, mode::GroupMode, UIAction};

const MAX_DIAGNOSTICS: usize = 200;

/// Everything the dashboard shows, plus the draft being edited.
///
/// Methods that need the server return the `UIAction` to dispatch; the
/// outcome comes back later as a `UIEvent`.
#[derive(Debug)]
pub struct DashboardState {
    /// The last successfully fetched list, in server order.
    pub logs: Vec<LogEntry>,
    pub draft: Draft,
    /// Entry being edited; submitting updates it instead of creating.
    pub editing: Option<Uuid>,
    pub filter: LogFilter,
    pub group_mode: GroupMode,
    /// Index into `ordered_entries()`.
    pub selected: usize,
    pub error: Option<String>,
    /// A request chain is in flight.
    pub pending: bool,
    pub diagnostics: VecDeque<DiagnosticLine>,
    pub terminal_size: (u16, u16),
    options: DashboardOptions,
}

impl DashboardState {
    pub fn new(options: DashboardOptions) -> Self {
        let draft = Draft::new(&options);
        Self {
            logs: Vec::new(),
            draft,
            editing: None,
            filter: LogFilter::all(),
            group_mode: GroupMode::None,
            selected: 0,
            error: None,
            pending: false,
            diagnostics: VecDeque::with_capacity(MAX_DIAGNOSTICS),
            terminal_size: (80, 24),
            options,
        }
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    /// Fetches the list under the current filter.
    pub fn fetch(&mut self) -> UIAction {
        self.pending = true;
        UIAction::Fetch(self.filter)
    }

    /// Creates or updates from the draft. Blank drafts are ignored.
    pub fn submit(&mut self) -> Option<UIAction> {
        if self.draft.message.trim().is_empty() {
            return None;
        }

        let metadata = self.draft_metadata();
        let kind = self.draft.kind.as_str().to_string();
        let message = self.draft.message.clone();
        self.pending = true;

        Some(match self.editing {
            Some(id) => UIAction::Update {
                id,
                patch: LogPatch {
                    kind: Some(kind),
                    message: Some(message),
                    metadata: self.options.categories_enabled().then_some(metadata),
                },
                filter: self.filter,
            },
            None => UIAction::Create {
                draft: LogDraft {
                    kind: Some(kind),
                    message: Some(message),
                    metadata: Some(metadata),
                },
                filter: self.filter,
            },
        })
    }

    /// Copies the selected entry into the draft and targets it for update.
    /// The entry stays in the list.
    pub fn start_edit(&mut self) -> bool {
        let Some(entry) = self.selected_entry().cloned() else {
            return false;
        };
        self.draft.load(&entry, self.options.categories_enabled());
        self.editing = Some(entry.id);
        true
    }

    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            self.draft.reset(&self.options);
        }
    }

    pub fn delete_selected(&mut self) -> Option<UIAction> {
        let id = self.selected_entry()?.id;
        self.pending = true;
        Some(UIAction::Delete {
            id,
            filter: self.filter,
        })
    }

    /// Steps the filter through all → event → error → info → debug → all and
    /// re-fetches.
    pub fn cycle_filter(&mut self) -> UIAction {
        self.filter.kind = match self.filter.kind {
            None => Some(LogType::Event),
            Some(LogType::Debug) => None,
            Some(kind) => Some(kind.next()),
        };
        self.fetch()
    }

    pub fn cycle_group_mode(&mut self) {
        if !self.options.grouping {
            return;
        }
        self.group_mode = self.group_mode.next();
        if self.group_mode == GroupMode::ByCategory && !self.options.categories_enabled() {
            self.group_mode = self.group_mode.next();
        }
        self.selected = 0;
    }

    pub fn cycle_type(&mut self) {
        self.draft.kind = self.draft.kind.next();
    }

    pub fn cycle_category(&mut self) {
        self.draft.cycle_category(&self.options.categories);
    }

    pub fn push_diagnostic(&mut self, line: DiagnosticLine) {
        if self.diagnostics.len() >= MAX_DIAGNOSTICS {
            self.diagnostics.pop_front();
        }
        self.diagnostics.push_back(line);
    }

    fn draft_metadata(&self) -> Metadata {
        let mut metadata = self.draft.base_metadata.clone();
        if let Some(category) = &self.draft.category {
            metadata.insert(CATEGORY_KEY.to_string(), Value::String(category.clone()));
        }
        metadata
    }
}
