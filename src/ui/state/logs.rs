use crate::types::LogEntry;
use crate::ui::event::Mutation;
use crate::ui::grouping::{group_entries, LogGroup};

use super::DashboardState;

impl DashboardState {
    /// Replaces the cache with a fresh listing and clears the error flag.
    pub fn apply_logs(&mut self, logs: Vec<LogEntry>) {
        self.logs = logs;
        self.error = None;
        self.pending = false;
        self.clamp_selection();
    }

    /// Records a failed request. The cache and the draft are left untouched.
    pub fn record_failure(&mut self, message: String) {
        self.error = Some(message);
        self.pending = false;
    }

    /// A mutation went through; the follow-up fetch is still in flight.
    pub fn apply_mutation(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Created | Mutation::Updated => {
                self.editing = None;
                self.draft.reset(&self.options);
            }
            Mutation::Deleted => {}
        }
    }

    pub fn groups(&self) -> Vec<LogGroup<'_>> {
        group_entries(&self.logs, self.group_mode)
    }

    /// Entries in the order they are drawn.
    pub fn ordered_entries(&self) -> Vec<&LogEntry> {
        self.groups()
            .into_iter()
            .flat_map(|group| group.entries)
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&LogEntry> {
        self.ordered_entries().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.logs.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.logs.len().saturating_sub(1));
    }
}
