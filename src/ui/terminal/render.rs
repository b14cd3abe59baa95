use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write};
use tracing::Level;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::types::{LogEntry, LogType};
use crate::ui::mode::GroupMode;

use super::TerminalUI;

/// Lines below the list: error, draft, status, help.
const FOOTER_ROWS: u16 = 4;

enum Row<'a> {
    Header(String, usize),
    Entry(usize, &'a LogEntry),
}

fn type_color(kind: LogType) -> Color {
    match kind {
        LogType::Error => Color::Red,
        LogType::Info => Color::Blue,
        LogType::Debug => Color::DarkGrey,
        LogType::Event => Color::Green,
    }
}

/// Cuts `text` to at most `width` display columns.
fn fit(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 3 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    if width >= 3 {
        out.push_str("...");
    }
    out
}

impl TerminalUI {
    pub(super) fn render(&mut self) -> Result<()> {
        let mut stdout = stdout();

        queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let (width, height) = self.state.terminal_size;
        let list_height = height.saturating_sub(FOOTER_ROWS + 1);

        self.render_header(&mut stdout, width)?;
        self.render_list(&mut stdout, 1, width, list_height)?;

        let footer_row = height.saturating_sub(FOOTER_ROWS);
        self.render_error_line(&mut stdout, footer_row, width)?;
        self.render_status_line(&mut stdout, footer_row + 2, width)?;
        self.render_help(&mut stdout, footer_row + 3, width)?;
        // Drawn last so the cursor ends up in the draft.
        self.render_draft(&mut stdout, footer_row + 1, width)?;

        stdout.flush()?;
        Ok(())
    }

    fn render_header(&self, stdout: &mut impl Write, width: u16) -> Result<()> {
        let filter = self
            .state
            .filter
            .kind
            .map_or("all", |k| k.as_str());
        let text = format!(
            " LoopLog | Filter: {} | Group: {} | Entries: {}{}",
            filter,
            self.state.group_mode.label(),
            self.state.logs.len(),
            if self.state.pending { " | loading..." } else { "" },
        );
        let text = fit(&text, width as usize);
        let padding = (width as usize).saturating_sub(UnicodeWidthStr::width(text.as_str()));

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::DarkBlue),
            SetForegroundColor(Color::White),
            Print(text),
            Print(" ".repeat(padding)),
            ResetColor
        )?;
        Ok(())
    }

    fn render_list(&self, stdout: &mut impl Write, top: u16, width: u16, height: u16) -> Result<()> {
        let groups = self.state.groups();

        let mut rows = Vec::new();
        let mut index = 0;
        for group in &groups {
            if let Some(label) = &group.label {
                rows.push(Row::Header(label.clone(), group.entries.len()));
            }
            for entry in &group.entries {
                rows.push(Row::Entry(index, *entry));
                index += 1;
            }
        }

        if rows.iter().all(|r| matches!(r, Row::Header(..))) {
            let text = if self.state.pending { "Loading..." } else { "No logs yet." };
            queue!(
                stdout,
                cursor::MoveTo(1, top),
                SetForegroundColor(Color::DarkGrey),
                Print(text),
                ResetColor
            )?;
            return Ok(());
        }

        // Scroll just enough to keep the selected row visible.
        let selected_row = rows
            .iter()
            .position(|r| matches!(r, Row::Entry(i, _) if *i == self.state.selected))
            .unwrap_or(0);
        let visible = height as usize;
        let start = (selected_row + 1).saturating_sub(visible);

        for (line, row) in rows.iter().skip(start).take(visible).enumerate() {
            queue!(stdout, cursor::MoveTo(0, top + line as u16))?;
            match row {
                Row::Header(label, count) => {
                    let text = fit(&format!("── {} ({}) ──", label, count), width as usize);
                    queue!(
                        stdout,
                        SetForegroundColor(Color::Yellow),
                        SetAttribute(Attribute::Bold),
                        Print(text),
                        SetAttribute(Attribute::Reset),
                        ResetColor
                    )?;
                }
                Row::Entry(i, entry) => {
                    self.render_entry(stdout, *i, entry, width)?;
                }
            }
        }

        Ok(())
    }

    fn render_entry(&self, stdout: &mut impl Write, index: usize, entry: &LogEntry, width: u16) -> Result<()> {
        let selected = index == self.state.selected;
        let marker = match (selected, self.state.editing == Some(entry.id)) {
            (_, true) => '*',
            (true, false) => '>',
            (false, false) => ' ',
        };
        let timestamp = entry
            .created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S");
        let category = match (self.state.group_mode, entry.category()) {
            (GroupMode::ByCategory, _) | (_, None) => String::new(),
            (_, Some(c)) => format!(" ({})", c),
        };
        let line = format!(
            "{} {} {:5} {}{}",
            marker,
            timestamp,
            entry.kind.as_str(),
            entry.message,
            category
        );
        let line = fit(&line, width as usize);

        if selected {
            queue!(stdout, SetAttribute(Attribute::Reverse))?;
        }
        queue!(
            stdout,
            SetForegroundColor(type_color(entry.kind)),
            Print(line),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        Ok(())
    }

    fn render_error_line(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        if let Some(error) = &self.state.error {
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                SetForegroundColor(Color::Red),
                Print(fit(&format!(" {}", error), width as usize)),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn render_draft(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        let draft = &self.state.draft;
        let category = draft
            .category
            .as_ref()
            .map(|c| format!("[{}] ", c))
            .unwrap_or_default();
        let verb = if self.state.editing.is_some() { "update" } else { "log" };
        let prompt = format!("[{}] {}{}> ", draft.kind, category, verb);

        queue!(
            stdout,
            cursor::MoveTo(0, row),
            SetForegroundColor(type_color(draft.kind)),
            Print(&prompt),
            ResetColor,
            Print(&draft.message)
        )?;

        let prompt_width = UnicodeWidthStr::width(prompt.as_str());
        let input_width: usize = draft
            .message
            .chars()
            .take(draft.cursor_pos)
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
            .sum();
        let cursor_x = prompt_width + input_width;
        if cursor_x < width as usize {
            queue!(stdout, cursor::MoveTo(cursor_x as u16, row), cursor::Show)?;
        }
        Ok(())
    }

    fn render_status_line(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        let (text, color) = match self.state.diagnostics.back() {
            Some(line) => {
                let color = match line.level {
                    Level::ERROR => Color::Red,
                    Level::WARN => Color::Yellow,
                    _ => Color::White,
                };
                let text = format!(
                    " {} {:5} [{}] {}",
                    line.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S"),
                    line.level.as_str(),
                    line.module,
                    line.message
                );
                (text, color)
            }
            None => (format!(" {}", self.state.options().api_url), Color::White),
        };
        let text = fit(&text, width as usize);
        let padding = (width as usize).saturating_sub(UnicodeWidthStr::width(text.as_str()));

        queue!(
            stdout,
            cursor::MoveTo(0, row),
            SetBackgroundColor(Color::DarkGrey),
            SetForegroundColor(color),
            Print(text),
            Print(" ".repeat(padding)),
            ResetColor
        )?;
        Ok(())
    }

    fn render_help(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        let help = " Enter: submit | Tab: type | S-Tab: category | ↑↓: select | ^E edit | ^D delete | ^F filter | ^G group | ^R refresh | Esc: cancel | ^C exit";
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            SetForegroundColor(Color::DarkGrey),
            Print(fit(help, width as usize)),
            ResetColor
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::fit;

    #[test]
    fn fit_truncates_by_display_width() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("abcdefghij", 6), "abc...");
        assert_eq!(fit("日本語テキスト", 7), "日本...");
    }
}
