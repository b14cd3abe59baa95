//! Executes dashboard actions against the log service.
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::client::LogsApi;
use crate::types::LogFilter;
use crate::ui::event::Mutation;
use crate::ui::{UIAction, UIEvent};

/// Runs `action` in the background. The UI keeps handling input meanwhile;
/// results arrive as events in completion order, so a slow stale response
/// can land after a newer one.
pub fn handle_ui_action(
    action: UIAction,
    api: Arc<dyn LogsApi>,
    ui_sender: mpsc::UnboundedSender<UIEvent>,
) {
    tokio::spawn(async move {
        execute(action, api.as_ref(), &ui_sender).await;
    });
}

/// Runs one request chain: the mutation if any, then a re-fetch.
pub async fn execute(
    action: UIAction,
    api: &dyn LogsApi,
    ui_sender: &mpsc::UnboundedSender<UIEvent>,
) {
    debug!("Executing {:?}", action);

    let (mutation, filter) = match action {
        UIAction::Fetch(filter) => (None, filter),
        UIAction::Create { draft, filter } => (
            Some(
                api.create(&draft)
                    .await
                    .map(|_| Mutation::Created)
                    .map_err(|e| format!("Failed to submit log: {}", e)),
            ),
            filter,
        ),
        UIAction::Update { id, patch, filter } => (
            Some(
                api.update(&id, &patch)
                    .await
                    .map(|_| Mutation::Updated)
                    .map_err(|e| format!("Failed to submit log: {}", e)),
            ),
            filter,
        ),
        UIAction::Delete { id, filter } => (
            Some(
                api.delete(&id)
                    .await
                    .map(|_| Mutation::Deleted)
                    .map_err(|e| format!("Delete failed: {}", e)),
            ),
            filter,
        ),
    };

    match mutation {
        Some(Ok(done)) => {
            let _ = ui_sender.send(UIEvent::Mutated(done));
        }
        Some(Err(message)) => {
            error!("{}", message);
            let _ = ui_sender.send(UIEvent::RequestFailed(message));
            return;
        }
        None => {}
    }

    fetch(api, filter, ui_sender).await;
}

async fn fetch(api: &dyn LogsApi, filter: LogFilter, ui_sender: &mpsc::UnboundedSender<UIEvent>) {
    let event = match api.list(filter).await {
        Ok(logs) => {
            debug!("Fetched {} logs", logs.len());
            UIEvent::LogsLoaded(logs)
        }
        Err(e) => {
            let message = format!("Failed to fetch logs: {}", e);
            error!("{}", message);
            UIEvent::RequestFailed(message)
        }
    };
    let _ = ui_sender.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, Result};
    use crate::types::{LogDraft, LogEntry, LogPatch, LogType};
    use async_trait::async_trait;
    use chrono::Utc;
    use reqwest::StatusCode;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// In-memory stand-in for the service.
    #[derive(Default)]
    struct FakeApi {
        logs: Mutex<Vec<LogEntry>>,
        fail_list: bool,
    }

    fn not_found() -> ClientError {
        ClientError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Log not found".into(),
        }
    }

    #[async_trait]
    impl LogsApi for FakeApi {
        async fn list(&self, filter: LogFilter) -> Result<Vec<LogEntry>> {
            if self.fail_list {
                return Err(ClientError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "store unavailable".into(),
                });
            }
            let logs = self.logs.lock().unwrap();
            Ok(logs.iter().rev().filter(|e| filter.matches(e)).cloned().collect())
        }

        async fn create(&self, draft: &LogDraft) -> Result<LogEntry> {
            let entry = LogEntry {
                id: Uuid::new_v4(),
                kind: draft.kind.as_deref().unwrap_or("event").parse().unwrap(),
                message: draft.message.clone().unwrap_or_default(),
                metadata: draft.metadata.clone().unwrap_or_default(),
                created_at: Utc::now(),
            };
            self.logs.lock().unwrap().push(entry.clone());
            Ok(entry)
        }

        async fn update(&self, id: &Uuid, patch: &LogPatch) -> Result<LogEntry> {
            let mut logs = self.logs.lock().unwrap();
            let entry = logs.iter_mut().find(|e| e.id == *id).ok_or_else(not_found)?;
            if let Some(message) = &patch.message {
                entry.message = message.clone();
            }
            Ok(entry.clone())
        }

        async fn delete(&self, id: &Uuid) -> Result<()> {
            let mut logs = self.logs.lock().unwrap();
            let before = logs.len();
            logs.retain(|e| e.id != *id);
            if logs.len() == before {
                return Err(not_found());
            }
            Ok(())
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<UIEvent>) -> Vec<UIEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn create_is_followed_by_a_fetch() {
        let api = FakeApi::default();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let action = UIAction::Create {
            draft: LogDraft::new(LogType::Info, "build finished"),
            filter: LogFilter::all(),
        };
        execute(action, &api, &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], UIEvent::Mutated(Mutation::Created)));
        match &events[1] {
            UIEvent::LogsLoaded(logs) => {
                assert_eq!(logs.len(), 1);
                assert_eq!(logs[0].message, "build finished");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_mutation_skips_the_fetch() {
        let api = FakeApi::default();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let action = UIAction::Delete {
            id: Uuid::new_v4(),
            filter: LogFilter::all(),
        };
        execute(action, &api, &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        match &events[0] {
            UIEvent::RequestFailed(message) => assert!(message.starts_with("Delete failed")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_fetch_reports_an_error() {
        let api = FakeApi {
            fail_list: true,
            ..FakeApi::default()
        };
        let (tx, mut rx) = mpsc::unbounded_channel();

        execute(UIAction::Fetch(LogFilter::of(LogType::Error)), &api, &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], UIEvent::RequestFailed(m) if m.contains("store unavailable")));
    }
}
