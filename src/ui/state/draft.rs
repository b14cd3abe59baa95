use crate::config::DashboardOptions;
use crate::types::{LogEntry, LogType, Metadata};

/// The entry being composed: type, category, message and the metadata the
/// submit will carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub kind: LogType,
    pub category: Option<String>,
    pub message: String,
    /// Cursor position in characters, not bytes.
    pub cursor_pos: usize,
    /// Metadata the category is merged into on submit.
    pub base_metadata: Metadata,
}

impl Draft {
    pub fn new(options: &DashboardOptions) -> Self {
        Self {
            kind: LogType::default(),
            category: options.categories.first().cloned(),
            message: String::new(),
            cursor_pos: 0,
            base_metadata: options.default_metadata.clone(),
        }
    }

    /// Back to a fresh draft, keeping the chosen type and category.
    pub fn reset(&mut self, options: &DashboardOptions) {
        self.message.clear();
        self.cursor_pos = 0;
        self.base_metadata = options.default_metadata.clone();
    }

    pub fn load(&mut self, entry: &LogEntry, with_category: bool) {
        self.kind = entry.kind;
        self.message = entry.message.clone();
        self.cursor_pos = self.message.chars().count();
        self.base_metadata = entry.metadata.clone();
        if with_category {
            self.category = entry.category().map(str::to_string);
        }
    }

    /// Moves to the next configured category. An entry loaded with a label
    /// outside the list restarts at the first one.
    pub fn cycle_category(&mut self, categories: &[String]) {
        if categories.is_empty() {
            return;
        }
        let next = match self
            .category
            .as_ref()
            .and_then(|c| categories.iter().position(|known| known == c))
        {
            Some(i) => (i + 1) % categories.len(),
            None => 0,
        };
        self.category = Some(categories[next].clone());
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.message
            .char_indices()
            .nth(char_pos)
            .map_or(self.message.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_pos(self.cursor_pos);
        self.message.insert(byte_pos, c);
        self.cursor_pos += 1;
    }

    pub fn remove_char_before(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let byte_pos = self.byte_pos(self.cursor_pos - 1);
        self.message.remove(byte_pos);
        self.cursor_pos -= 1;
        true
    }

    pub fn remove_char_at(&mut self) -> bool {
        if self.cursor_pos >= self.message.chars().count() {
            return false;
        }
        let byte_pos = self.byte_pos(self.cursor_pos);
        self.message.remove(byte_pos);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.message.chars().count() {
            self.cursor_pos += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.message.chars().count();
    }
}
