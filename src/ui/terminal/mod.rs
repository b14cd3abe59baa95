//! This module defines the core components and logic for the terminal dashboard.
mod events;
mod lifecycle;
mod render;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::config::DashboardOptions;
use crate::ui::{DashboardState, UIAction, UIEvent};

pub struct TerminalUI {
    pub(super) state: DashboardState,
    pub(super) event_rx: mpsc::UnboundedReceiver<UIEvent>,
    pub(super) action_tx: mpsc::UnboundedSender<UIAction>,
    pub(super) should_quit: bool,
    pub(super) raw_mode: bool,
}

impl TerminalUI {
    pub fn new(
        options: DashboardOptions,
        event_rx: mpsc::UnboundedReceiver<UIEvent>,
        action_tx: mpsc::UnboundedSender<UIAction>,
    ) -> Self {
        Self {
            state: DashboardState::new(options),
            event_rx,
            action_tx,
            should_quit: false,
            raw_mode: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// The fetch issued when the dashboard opens.
    pub fn initial_fetch(&mut self) -> UIAction {
        self.state.fetch()
    }

    pub async fn run(&mut self) -> Result<()> {
        self.initialize_terminal()?;

        debug!("Starting terminal UI loop");
        self.render()?;

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.handle_event(event) {
                error!("Error handling UI event: {}", e);
            }
            if self.should_quit {
                break;
            }
            self.render()?;
        }

        self.cleanup()
    }

    pub(super) fn dispatch(&self, action: UIAction) {
        if self.action_tx.send(action).is_err() {
            error!("Action worker is gone, dropping request");
        }
    }
}
