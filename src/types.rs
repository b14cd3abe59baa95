//! Shared data types for log entries, as stored and as exchanged over HTTP.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Open key-value metadata attached to an entry.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata key read by the dashboard's category grouping.
pub const CATEGORY_KEY: &str = "category";

/// The fixed set of log entry categories.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Event,
    Error,
    Info,
    Debug,
}

impl LogType {
    pub const ALL: [LogType; 4] = [LogType::Event, LogType::Error, LogType::Info, LogType::Debug];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Event => "event",
            LogType::Error => "error",
            LogType::Info => "info",
            LogType::Debug => "debug",
        }
    }

    /// Returns the next type in declaration order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            LogType::Event => LogType::Error,
            LogType::Error => LogType::Info,
            LogType::Info => LogType::Debug,
            LogType::Debug => LogType::Event,
        }
    }
}

impl Default for LogType {
    fn default() -> Self {
        Self::Event
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four log types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a valid log type (expected event, error, info or debug)")]
pub struct InvalidLogType(pub String);

impl FromStr for LogType {
    type Err = InvalidLogType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(LogType::Event),
            "error" => Ok(LogType::Error),
            "info" => Ok(LogType::Info),
            "debug" => Ok(LogType::Debug),
            other => Err(InvalidLogType(other.to_string())),
        }
    }
}

/// A persisted log entry, in its wire shape.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: LogType,
    pub message: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    /// The `metadata.category` value, if it is a non-empty string.
    pub fn category(&self) -> Option<&str> {
        self.metadata
            .get(CATEGORY_KEY)
            .and_then(|v| v.as_str())
            .filter(|c| !c.is_empty())
    }
}

/// Unvalidated input for creating an entry.
///
/// Fields are loosely typed so that the store, not the JSON decoder, decides
/// what a valid entry is.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LogDraft {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl LogDraft {
    pub fn new(kind: LogType, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            message: Some(message.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Partial update of an entry. Only these three fields are updatable;
/// anything else in a request body is ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LogPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Restricts a listing to a single type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub kind: Option<LogType>,
}

impl LogFilter {
    pub fn all() -> Self {
        Self { kind: None }
    }

    pub fn of(kind: LogType) -> Self {
        Self { kind: Some(kind) }
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.kind.map_or(true, |k| entry.kind == k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn log_type_parses_only_known_values() {
        for kind in LogType::ALL {
            assert_eq!(kind.as_str().parse::<LogType>(), Ok(kind));
        }
        assert!("warning".parse::<LogType>().is_err());
        assert!("Error".parse::<LogType>().is_err());
        assert!("".parse::<LogType>().is_err());
    }

    #[test]
    fn entry_serializes_with_wire_field_names() {
        let entry = LogEntry {
            id: Uuid::nil(),
            kind: LogType::Info,
            message: "build finished".into(),
            metadata: json!({"category": "work"}).as_object().cloned().unwrap(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "info");
        assert_eq!(value["message"], "build finished");
        assert_eq!(value["metadata"]["category"], "work");
        assert!(value.get("createdAt").is_some());
        assert_eq!(entry.category(), Some("work"));
    }

    #[test]
    fn patch_ignores_fields_outside_the_whitelist() {
        let patch: LogPatch = serde_json::from_value(json!({
            "message": "edited",
            "createdAt": "1999-01-01T00:00:00Z",
            "id": "not-yours",
        }))
        .unwrap();

        assert_eq!(patch.message.as_deref(), Some("edited"));
        assert!(patch.kind.is_none());
        assert!(patch.metadata.is_none());
    }
}
