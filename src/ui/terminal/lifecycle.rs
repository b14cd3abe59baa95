//! Entering and leaving the dashboard's alternate screen.
use anyhow::Result;
use crossterm::{cursor, execute, terminal};
use std::io::stdout;
use std::sync::Once;

use super::TerminalUI;

static PANIC_HOOK: Once = Once::new();

/// Leaves raw mode and the alternate screen.
fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
    Ok(())
}

/// A panic inside the dashboard would otherwise be printed into the raw
/// alternate screen and lost.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            previous(info);
        }));
    });
}

impl TerminalUI {
    pub(super) fn initialize_terminal(&mut self) -> Result<()> {
        install_panic_hook();

        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All)
        )?;

        self.state.terminal_size = terminal::size()?;
        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> Result<()> {
        if std::mem::take(&mut self.raw_mode) {
            restore_terminal()?;
        }
        Ok(())
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
