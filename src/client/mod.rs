//! HTTP client for the log service, used by the dashboard.
use crate::types::{LogDraft, LogEntry, LogFilter, LogPatch};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Default location of the log service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001/api/logs";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// The operations the dashboard performs against the service.
#[async_trait]
pub trait LogsApi: Send + Sync {
    async fn list(&self, filter: LogFilter) -> Result<Vec<LogEntry>>;
    async fn create(&self, draft: &LogDraft) -> Result<LogEntry>;
    async fn update(&self, id: &Uuid, patch: &LogPatch) -> Result<LogEntry>;
    async fn delete(&self, id: &Uuid) -> Result<()>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// A `LogsApi` implementation over HTTP.
#[derive(Clone)]
pub struct HttpLogsApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLogsApi {
    /// Creates a client rooted at the `/api/logs` collection URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn item_url(&self, id: &Uuid) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Turns a non-2xx response into `ClientError::Status`, reading the
    /// service's `{ "error": ... }` body when there is one.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or(text);
        Err(ClientError::Status { status, message })
    }
}

#[async_trait]
impl LogsApi for HttpLogsApi {
    async fn list(&self, filter: LogFilter) -> Result<Vec<LogEntry>> {
        let mut request = self.http.get(&self.base_url);
        if let Some(kind) = filter.kind {
            request = request.query(&[("type", kind.as_str())]);
        }
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, draft: &LogDraft) -> Result<LogEntry> {
        let response = self.http.post(&self.base_url).json(draft).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update(&self, id: &Uuid, patch: &LogPatch) -> Result<LogEntry> {
        let response = self.http.put(self.item_url(id)).json(patch).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let response = self.http.delete(self.item_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
