use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::ui::UIEvent;

use super::TerminalUI;

impl TerminalUI {
    pub(crate) fn handle_event(&mut self, event: UIEvent) -> Result<()> {
        match event {
            UIEvent::LogsLoaded(logs) => {
                self.state.apply_logs(logs);
            }
            UIEvent::Mutated(mutation) => {
                self.state.apply_mutation(mutation);
            }
            UIEvent::RequestFailed(message) => {
                self.state.record_failure(message);
            }
            UIEvent::Diagnostic(line) => {
                self.state.push_diagnostic(line);
            }
            UIEvent::KeyPress(key_event) => {
                self.handle_key_event(key_event);
            }
            UIEvent::Resize(width, height) => {
                self.state.terminal_size = (width, height);
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('e') => {
                    self.state.start_edit();
                }
                KeyCode::Char('d') => {
                    if let Some(action) = self.state.delete_selected() {
                        self.dispatch(action);
                    }
                }
                KeyCode::Char('f') => {
                    let action = self.state.cycle_filter();
                    self.dispatch(action);
                }
                KeyCode::Char('g') => self.state.cycle_group_mode(),
                KeyCode::Char('r') => {
                    let action = self.state.fetch();
                    self.dispatch(action);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter => {
                if let Some(action) = self.state.submit() {
                    self.dispatch(action);
                }
            }
            KeyCode::Esc => self.state.cancel_edit(),
            KeyCode::Tab => self.state.cycle_type(),
            KeyCode::BackTab => self.state.cycle_category(),
            KeyCode::Up => self.state.select_prev(),
            KeyCode::Down => self.state.select_next(),
            KeyCode::Char(c) => self.state.draft.insert_char(c),
            KeyCode::Backspace => {
                self.state.draft.remove_char_before();
            }
            KeyCode::Delete => {
                self.state.draft.remove_char_at();
            }
            KeyCode::Left => self.state.draft.cursor_left(),
            KeyCode::Right => self.state.draft.cursor_right(),
            KeyCode::Home => self.state.draft.cursor_home(),
            KeyCode::End => self.state.draft.cursor_end(),
            _ => {}
        }
    }
}
