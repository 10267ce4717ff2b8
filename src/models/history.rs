//! History entry model matching the frontend HistoryEntry interface.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of user action a history entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Diagnosis,
    Market,
    Schemes,
    Chat,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Diagnosis => "diagnosis",
            ActivityType::Market => "market",
            ActivityType::Schemes => "schemes",
            ActivityType::Chat => "chat",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One durable record of a completed user action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub query: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// ISO-8601 completion time
    pub timestamp: String,
    pub preview: String,
    /// Opaque payload, e.g. a serialized diagnosis result
    #[serde(default)]
    pub data: serde_json::Value,
}

impl HistoryEntry {
    /// Build an entry stamped with a fresh time-ordered id and the current time.
    pub fn new(
        activity_type: ActivityType,
        query: impl Into<String>,
        preview: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            query: query.into(),
            activity_type,
            timestamp: chrono::Utc::now().to_rfc3339(),
            preview: preview.into(),
            data,
        }
    }
}

/// Request body for recording an activity from the frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHistoryRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub query: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl CreateHistoryRequest {
    /// Fill in the id and timestamp the caller left out.
    pub fn into_entry(self) -> HistoryEntry {
        let mut entry = HistoryEntry::new(self.activity_type, self.query, self.preview, self.data);
        if let Some(id) = self.id {
            entry.id = id;
        }
        if let Some(timestamp) = self.timestamp {
            entry.timestamp = timestamp;
        }
        entry
    }
}
