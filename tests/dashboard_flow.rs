//! Drives the dashboard's request chains against a live service.

use std::sync::Arc;

use looplog::client::{HttpLogsApi, LogsApi};
use looplog::config::DashboardOptions;
use looplog::storage::{open_database, DatabaseTarget, LogStore, SledLogStore};
use looplog::types::{LogFilter, LogType};
use looplog::ui::grouping::group_entries;
use looplog::ui::runner::actions::execute;
use looplog::ui::{DashboardState, GroupMode, Mutation, UIAction, UIEvent};
use looplog::web;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

async fn start_server() -> (String, oneshot::Sender<()>) {
    let db = open_database(&DatabaseTarget::Temporary).expect("Failed to open database");
    let store: Arc<dyn LogStore> = Arc::new(SledLogStore::new(db).expect("Failed to open store"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(web::serve(listener, store, async move {
        let _ = rx.await;
    }));
    (format!("http://{}/api/logs", addr), tx)
}

/// Runs `action` and feeds every resulting event back into `state`.
async fn run(state: &mut DashboardState, api: &dyn LogsApi, action: UIAction) -> Vec<UIEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    execute(action, api, &tx).await;
    drop(tx);

    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        match &event {
            UIEvent::LogsLoaded(logs) => state.apply_logs(logs.clone()),
            UIEvent::Mutated(m) => state.apply_mutation(*m),
            UIEvent::RequestFailed(msg) => state.record_failure(msg.clone()),
            _ => {}
        }
        seen.push(event);
    }
    seen
}

fn type_into(state: &mut DashboardState, text: &str) {
    for c in text.chars() {
        state.draft.insert_char(c);
    }
}

#[tokio::test]
async fn test_create_edit_delete_cycle() {
    let (url, shutdown) = start_server().await;
    let api = HttpLogsApi::new(url.clone());
    let mut state = DashboardState::new(DashboardOptions {
        api_url: url,
        ..DashboardOptions::default()
    });

    let fetch = state.fetch();
    run(&mut state, &api, fetch).await;
    assert!(state.logs.is_empty());

    state.cycle_category();
    type_into(&mut state, "deploy started");
    let create = state.submit().unwrap();
    let events = run(&mut state, &api, create).await;
    assert!(matches!(events[0], UIEvent::Mutated(Mutation::Created)));
    assert_eq!(state.logs.len(), 1);
    assert_eq!(state.logs[0].message, "deploy started");
    assert_eq!(state.logs[0].category(), Some("work"));
    assert!(state.draft.message.is_empty());

    assert!(state.start_edit());
    state.cycle_type();
    type_into(&mut state, " and finished");
    let update = state.submit().unwrap();
    run(&mut state, &api, update).await;
    assert_eq!(state.editing, None);
    assert_eq!(state.logs[0].message, "deploy started and finished");
    assert_eq!(state.logs[0].kind, LogType::Error);

    let delete = state.delete_selected().unwrap();
    run(&mut state, &api, delete).await;
    assert!(state.logs.is_empty());
    assert_eq!(state.error, None);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_filter_and_grouping_on_fetched_list() {
    let (url, shutdown) = start_server().await;
    let api = HttpLogsApi::new(url.clone());
    let mut state = DashboardState::new(DashboardOptions {
        api_url: url,
        ..DashboardOptions::default()
    });

    for (kind, category) in [
        (LogType::Event, "work"),
        (LogType::Error, "social"),
        (LogType::Event, "social"),
    ] {
        let draft = looplog::types::LogDraft::new(kind, "entry").with_metadata(
            serde_json::json!({ "category": category })
                .as_object()
                .cloned()
                .unwrap(),
        );
        api.create(&draft).await.unwrap();
    }

    let fetch = state.cycle_filter();
    assert_eq!(fetch, UIAction::Fetch(LogFilter::of(LogType::Event)));
    run(&mut state, &api, fetch).await;
    assert_eq!(state.logs.len(), 2);

    let groups = group_entries(&state.logs, GroupMode::ByCategory);
    let labels: Vec<_> = groups.iter().map(|g| g.label.clone().unwrap()).collect();
    assert_eq!(labels, ["social", "work"]);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_unreachable_service_sets_error_and_keeps_cache() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/logs", listener.local_addr().unwrap());
    drop(listener);

    let api = HttpLogsApi::new(url);
    let mut state = DashboardState::new(DashboardOptions::default());
    type_into(&mut state, "lost");
    let create = state.submit().unwrap();
    let events = run(&mut state, &api, create).await;

    assert_eq!(events.len(), 1);
    let error = state.error.clone().unwrap();
    assert!(error.starts_with("Failed to submit log"), "{}", error);
    assert_eq!(state.draft.message, "lost");
    assert!(!state.pending);
}
