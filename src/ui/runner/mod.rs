use super::{TerminalUI, UIAction, UIEvent};
use crate::client::{HttpLogsApi, LogsApi};
use crate::config::DashboardOptions;
use crate::logging::{DashboardLogCollector, DiagnosticBuffer};
use anyhow::Result;
use crossterm::event::{self, Event};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub mod actions;
use actions::handle_ui_action;

/// Runs the dashboard against the service at `options.api_url` until the
/// user exits.
pub async fn run_dashboard(options: DashboardOptions) -> Result<()> {
    let buffer = Arc::new(DiagnosticBuffer::new(1000));
    if let Err(e) = DashboardLogCollector::init_subscriber(buffer.clone()) {
        eprintln!("Failed to initialize dashboard log collector: {}", e);
    }

    let api: Arc<dyn LogsApi> = Arc::new(HttpLogsApi::new(options.api_url.clone()));
    info!("Starting LoopLog dashboard against {}", options.api_url);

    let (ui_event_tx, ui_event_rx) = mpsc::unbounded_channel::<UIEvent>();
    let (ui_action_tx, mut ui_action_rx) = mpsc::unbounded_channel::<UIAction>();

    buffer.set_ui_sender(ui_event_tx.clone());

    let mut terminal_ui = TerminalUI::new(options, ui_event_rx, ui_action_tx.clone());

    // crossterm's poll/read block, so they get their own thread.
    let ui_event_tx_keys = ui_event_tx.clone();
    tokio::task::spawn_blocking(move || loop {
        if event::poll(Duration::from_millis(100)).unwrap_or(false) {
            let sent = match event::read() {
                Ok(Event::Key(key_event)) => ui_event_tx_keys.send(UIEvent::KeyPress(key_event)),
                Ok(Event::Resize(width, height)) => {
                    ui_event_tx_keys.send(UIEvent::Resize(width, height))
                }
                Ok(_) => Ok(()),
                Err(e) => {
                    error!("Failed to read terminal event: {}", e);
                    Ok(())
                }
            };
            if sent.is_err() {
                debug!("UI event channel closed, stopping key reader");
                break;
            }
        } else if ui_event_tx_keys.is_closed() {
            break;
        }
    });

    let ui_event_tx_actions = ui_event_tx.clone();
    tokio::spawn(async move {
        while let Some(action) = ui_action_rx.recv().await {
            handle_ui_action(action, api.clone(), ui_event_tx_actions.clone());
        }
    });

    let initial_fetch = terminal_ui.initial_fetch();
    let _ = ui_action_tx.send(initial_fetch);

    terminal_ui.run().await
}
