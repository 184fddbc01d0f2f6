//! Activity log entries recorded on admin actions.
//!
//! Entries are append-only and kept newest first in a bounded array.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action tags written by the admin dashboard.
pub mod actions {
    pub const ADMIN_ACCESS_DASHBOARD: &str = "ADMIN_ACCESS_DASHBOARD";
    pub const ADMIN_LOGOUT: &str = "ADMIN_LOGOUT";
    pub const DELETE_CONTENT: &str = "DELETE_CONTENT";
    pub const UPLOAD_BATCH: &str = "UPLOAD_BATCH";
}

/// A single activity log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    /// Epoch milliseconds at creation, as a string
    pub id: String,

    /// Free-form action tag (see [`actions`])
    pub action: String,

    /// When the action happened (ISO 8601)
    pub timestamp: String,

    /// Free-form details
    #[serde(default = "empty_metadata")]
    pub metadata: Value,
}

fn empty_metadata() -> Value {
    Value::Object(Default::default())
}

impl ActivityLog {
    /// Create an entry stamped with the current time
    pub fn new(action: impl Into<String>, metadata: Value) -> Self {
        Self::at(Utc::now(), action, metadata)
    }

    /// Create an entry stamped with the given time
    pub fn at(now: DateTime<Utc>, action: impl Into<String>, metadata: Value) -> Self {
        let metadata = if metadata.is_null() {
            empty_metadata()
        } else {
            metadata
        };

        Self {
            id: now.timestamp_millis().to_string(),
            action: action.into(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            metadata,
        }
    }
}
