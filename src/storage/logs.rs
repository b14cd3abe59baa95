//! This module defines the storage interface and implementation for log entries.
use super::error::{LogStoreError, Result};
use crate::types::{LogDraft, LogEntry, LogFilter, LogPatch, LogType};
use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::ConflictableTransactionError;
use sled::{Db, Transactional};
use tracing::{debug, warn};
use uuid::Uuid;

/// Upper bound on the number of entries a listing returns.
pub const MAX_LIST_ENTRIES: usize = 100;

/// A trait for persisting log entries.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Validates a draft and stores it as a new entry.
    ///
    /// The store assigns the `id` and `created_at` of the entry.
    ///
    /// # Errors
    ///
    /// Returns `LogStoreError::Validation` if the type is missing or not one of
    /// the four known values, or if the message is missing or empty.
    async fn create(&self, draft: LogDraft) -> Result<LogEntry>;

    /// Lists entries, newest first, capped at [`MAX_LIST_ENTRIES`].
    ///
    /// Entries created at the same instant are ordered newest-inserted first.
    async fn list(&self, filter: LogFilter) -> Result<Vec<LogEntry>>;

    /// Applies a partial update to an existing entry.
    ///
    /// `created_at` is never changed. A `metadata` patch replaces the whole map.
    ///
    /// # Errors
    ///
    /// Returns `LogStoreError::NotFound` if no entry has this id, which is
    /// checked before the patch itself is validated.
    async fn update_by_id(&self, id: &Uuid, patch: LogPatch) -> Result<LogEntry>;

    /// Whether an entry with this id is stored.
    async fn exists(&self, id: &Uuid) -> Result<bool>;

    /// Deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns `LogStoreError::NotFound` if no entry has this id.
    async fn delete_by_id(&self, id: &Uuid) -> Result<()>;

    /// Flushes pending writes. Called once on shutdown.
    async fn close(&self) -> Result<()>;
}

/// The on-disk document: the entry plus its insertion sequence.
#[derive(Serialize, Deserialize)]
struct StoredLog {
    #[serde(flatten)]
    entry: LogEntry,
    seq: u64,
}

/// A `LogStore` implementation using `sled` for storage.
///
/// Documents live in the `logs` tree keyed by id. The `logs_by_time` tree
/// indexes them by creation time and insertion sequence so listings can walk
/// newest-first without loading every document.
pub struct SledLogStore {
    db: Db,
    docs: sled::Tree,
    by_time: sled::Tree,
}

impl SledLogStore {
    /// Creates a new `SledLogStore` over an already opened database.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying trees cannot be opened.
    pub fn new(db: Db) -> Result<Self> {
        let docs = db.open_tree("logs")?;
        let by_time = db.open_tree("logs_by_time")?;
        Ok(Self { db, docs, by_time })
    }

    /// Builds the index key. Flipping the sign bit keeps big-endian byte order
    /// equal to numeric order for negative timestamps too.
    fn time_key(created_at: &DateTime<Utc>, seq: u64) -> [u8; 16] {
        let micros = (created_at.timestamp_micros() as u64) ^ (1 << 63);
        let mut key = [0u8; 16];
        key[..8].copy_from_slice(&micros.to_be_bytes());
        key[8..].copy_from_slice(&seq.to_be_bytes());
        key
    }

    fn decode(data: &[u8]) -> Result<StoredLog> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// The current time cut to the index key's microsecond precision, so the
/// stored timestamp and the listing order always agree.
fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

fn validate_kind(kind: Option<&str>) -> Result<LogType> {
    match kind {
        None => Err(LogStoreError::validation("Path `type` is required.")),
        Some(raw) => raw
            .parse::<LogType>()
            .map_err(|e| LogStoreError::validation(e.to_string())),
    }
}

fn validate_message(message: Option<String>) -> Result<String> {
    match message {
        Some(m) if !m.is_empty() => Ok(m),
        _ => Err(LogStoreError::validation("Path `message` is required.")),
    }
}

#[async_trait]
impl LogStore for SledLogStore {
    async fn create(&self, draft: LogDraft) -> Result<LogEntry> {
        let kind = validate_kind(draft.kind.as_deref())?;
        let message = validate_message(draft.message)?;

        let entry = LogEntry {
            id: Uuid::new_v4(),
            kind,
            message,
            metadata: draft.metadata.unwrap_or_default(),
            created_at: now_micros(),
        };
        let seq = self.db.generate_id()?;
        let doc = serde_json::to_vec(&StoredLog {
            entry: entry.clone(),
            seq,
        })?;
        let index_key = Self::time_key(&entry.created_at, seq);
        let id_bytes = *entry.id.as_bytes();

        (&self.docs, &self.by_time).transaction(|(docs, by_time)| {
            docs.insert(&id_bytes[..], doc.as_slice())?;
            by_time.insert(&index_key[..], &id_bytes[..])?;
            Ok::<_, ConflictableTransactionError<LogStoreError>>(())
        })?;

        debug!("Stored log {} (seq {})", entry.id, seq);
        Ok(entry)
    }

    async fn list(&self, filter: LogFilter) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::new();

        for result in self.by_time.iter().rev() {
            let (_key, id) = result?;
            let Some(data) = self.docs.get(&id)? else {
                warn!("Time index points at a missing document, skipping");
                continue;
            };
            let stored = Self::decode(&data)?;
            if filter.matches(&stored.entry) {
                entries.push(stored.entry);
                if entries.len() >= MAX_LIST_ENTRIES {
                    break;
                }
            }
        }

        Ok(entries)
    }

    async fn update_by_id(&self, id: &Uuid, patch: LogPatch) -> Result<LogEntry> {
        let key = *id.as_bytes();

        let updated = self.docs.transaction(|docs| {
            let Some(data) = docs.get(&key[..])? else {
                return Err(ConflictableTransactionError::Abort(LogStoreError::NotFound));
            };
            let mut stored =
                Self::decode(&data).map_err(ConflictableTransactionError::Abort)?;

            if let Some(kind) = patch.kind.as_deref() {
                stored.entry.kind =
                    validate_kind(Some(kind)).map_err(ConflictableTransactionError::Abort)?;
            }
            if let Some(message) = &patch.message {
                stored.entry.message = validate_message(Some(message.clone()))
                    .map_err(ConflictableTransactionError::Abort)?;
            }
            if let Some(metadata) = &patch.metadata {
                stored.entry.metadata = metadata.clone();
            }

            let doc = serde_json::to_vec(&stored)
                .map_err(|e| ConflictableTransactionError::Abort(e.into()))?;
            docs.insert(&key[..], doc)?;
            Ok(stored.entry)
        })?;

        debug!("Updated log {}", id);
        Ok(updated)
    }

    async fn exists(&self, id: &Uuid) -> Result<bool> {
        Ok(self.docs.contains_key(id.as_bytes())?)
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<()> {
        let key = *id.as_bytes();

        (&self.docs, &self.by_time).transaction(|(docs, by_time)| {
            let Some(data) = docs.remove(&key[..])? else {
                return Err(ConflictableTransactionError::Abort(LogStoreError::NotFound));
            };
            let stored = Self::decode(&data).map_err(ConflictableTransactionError::Abort)?;
            by_time.remove(&Self::time_key(&stored.entry.created_at, stored.seq)[..])?;
            Ok(())
        })?;

        debug!("Deleted log {}", id);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let bytes = self.db.flush_async().await?;
        debug!("Flushed {} bytes on close", bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metadata;
    use serde_json::json;

    fn store() -> SledLogStore {
        let db = sled::Config::new().temporary(true).open().unwrap();
        SledLogStore::new(db).unwrap()
    }

    fn meta(value: serde_json::Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_accepts_every_known_type() {
        let store = store();
        for kind in LogType::ALL {
            let entry = store.create(LogDraft::new(kind, "hello")).await.unwrap();
            assert_eq!(entry.kind, kind);
            assert!(entry.metadata.is_empty());
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_or_missing_type() {
        let store = store();
        for kind in [Some("warning"), Some("INFO"), Some(""), None] {
            let draft = LogDraft {
                kind: kind.map(str::to_string),
                message: Some("hello".into()),
                metadata: None,
            };
            let err = store.create(draft).await.unwrap_err();
            assert!(matches!(err, LogStoreError::Validation(_)), "{:?}", kind);
        }
        assert!(store.list(LogFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_or_missing_message_but_does_not_trim() {
        let store = store();
        for message in [Some(""), None] {
            let draft = LogDraft {
                kind: Some("info".into()),
                message: message.map(str::to_string),
                metadata: None,
            };
            assert!(matches!(
                store.create(draft).await,
                Err(LogStoreError::Validation(_))
            ));
        }

        let spaced = store.create(LogDraft::new(LogType::Info, "  ")).await.unwrap();
        assert_eq!(spaced.message, "  ");
    }

    #[tokio::test]
    async fn list_is_newest_first_and_capped() {
        let store = store();
        for i in 0..(MAX_LIST_ENTRIES + 5) {
            store
                .create(LogDraft::new(LogType::Event, format!("entry {}", i)))
                .await
                .unwrap();
        }

        let listed = store.list(LogFilter::all()).await.unwrap();
        assert_eq!(listed.len(), MAX_LIST_ENTRIES);
        assert_eq!(listed[0].message, format!("entry {}", MAX_LIST_ENTRIES + 4));
        assert_eq!(listed[MAX_LIST_ENTRIES - 1].message, "entry 5");
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn list_filters_by_type() {
        let store = store();
        store.create(LogDraft::new(LogType::Info, "a")).await.unwrap();
        store.create(LogDraft::new(LogType::Error, "b")).await.unwrap();
        store.create(LogDraft::new(LogType::Error, "c")).await.unwrap();
        store.create(LogDraft::new(LogType::Debug, "d")).await.unwrap();

        let errors = store.list(LogFilter::of(LogType::Error)).await.unwrap();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["c", "b"]);
        assert!(errors.iter().all(|e| e.kind == LogType::Error));
    }

    #[tokio::test]
    async fn filtered_list_returns_what_was_created() {
        let store = store();
        let draft = LogDraft::new(LogType::Debug, "round trip")
            .with_metadata(meta(json!({"user": "dev", "page": "test"})));
        let created = store.create(draft.clone()).await.unwrap();

        let listed = store.list(LogFilter::of(LogType::Debug)).await.unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(Some(listed[0].kind.as_str().to_string()), draft.kind);
        assert_eq!(Some(listed[0].message.clone()), draft.message);
        assert_eq!(Some(listed[0].metadata.clone()), draft.metadata);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_replaces_metadata() {
        let store = store();
        let created = store
            .create(
                LogDraft::new(LogType::Info, "before")
                    .with_metadata(meta(json!({"category": "work", "user": "dev"}))),
            )
            .await
            .unwrap();

        let updated = store
            .update_by_id(
                &created.id,
                LogPatch {
                    kind: Some("error".into()),
                    message: Some("after".into()),
                    metadata: Some(meta(json!({"category": "social"}))),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.kind, LogType::Error);
        assert_eq!(updated.message, "after");
        assert_eq!(updated.metadata, meta(json!({"category": "social"})));

        let listed = store.list(LogFilter::all()).await.unwrap();
        assert_eq!(listed, vec![updated]);
    }

    #[tokio::test]
    async fn update_checks_existence_before_validating() {
        let store = store();
        let bad_patch = LogPatch {
            kind: Some("nope".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_by_id(&Uuid::new_v4(), bad_patch.clone()).await,
            Err(LogStoreError::NotFound)
        ));

        let created = store.create(LogDraft::new(LogType::Info, "x")).await.unwrap();
        assert!(matches!(
            store.update_by_id(&created.id, bad_patch).await,
            Err(LogStoreError::Validation(_))
        ));
        let empty_message = LogPatch {
            message: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_by_id(&created.id, empty_message).await,
            Err(LogStoreError::Validation(_))
        ));

        let unchanged = store.list(LogFilter::all()).await.unwrap();
        assert_eq!(unchanged, vec![created]);
    }

    #[tokio::test]
    async fn created_at_matches_index_precision() {
        let store = store();
        for i in 0..20 {
            let entry = store
                .create(LogDraft::new(LogType::Debug, format!("burst {}", i)))
                .await
                .unwrap();
            assert_eq!(entry.created_at.timestamp_subsec_nanos() % 1_000, 0);
        }

        let listed = store.list(LogFilter::all()).await.unwrap();
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let store = store();
        let a = store.create(LogDraft::new(LogType::Info, "a")).await.unwrap();
        let b = store.create(LogDraft::new(LogType::Info, "b")).await.unwrap();

        assert!(store.exists(&a.id).await.unwrap());
        store.delete_by_id(&a.id).await.unwrap();
        assert!(!store.exists(&a.id).await.unwrap());
        assert!(matches!(
            store.delete_by_id(&a.id).await,
            Err(LogStoreError::NotFound)
        ));

        let remaining = store.list(LogFilter::all()).await.unwrap();
        assert_eq!(remaining, vec![b]);
        assert_eq!(store.by_time.len(), 1);
    }

    #[tokio::test]
    async fn entries_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");

        let id = {
            let store = SledLogStore::new(sled::open(&path).unwrap()).unwrap();
            let entry = store.create(LogDraft::new(LogType::Event, "kept")).await.unwrap();
            store.close().await.unwrap();
            entry.id
        };

        let store = SledLogStore::new(sled::open(&path).unwrap()).unwrap();
        let listed = store.list(LogFilter::all()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
    }
}
