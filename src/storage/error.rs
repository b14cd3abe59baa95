//! Error type shared by the storage layer.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogStoreError>;

#[derive(Debug, Error)]
pub enum LogStoreError {
    /// A missing or invalid field, or a bad enum value.
    #[error("{0}")]
    Validation(String),

    /// No entry exists under the requested id.
    #[error("Log not found")]
    NotFound,

    /// The database failed or returned a document it could not decode.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl LogStoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<sled::Error> for LogStoreError {
    fn from(err: sled::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for LogStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unavailable(format!("corrupt document: {}", err))
    }
}

impl From<sled::transaction::TransactionError<LogStoreError>> for LogStoreError {
    fn from(err: sled::transaction::TransactionError<LogStoreError>) -> Self {
        match err {
            sled::transaction::TransactionError::Abort(e) => e,
            sled::transaction::TransactionError::Storage(e) => e.into(),
        }
    }
}
