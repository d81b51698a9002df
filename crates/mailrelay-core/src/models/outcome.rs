/// Send outcomes and the persisted audit record
use crate::error::ErrorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub success: bool,
    pub message_id: Option<String>,
    pub duration: Duration,
    pub error: Option<ErrorKind>,
}

impl SendOutcome {
    pub fn sent(message_id: String, duration: Duration) -> Self {
        Self {
            success: true,
            message_id: Some(message_id),
            duration,
            error: None,
        }
    }

    pub fn failed(kind: ErrorKind, duration: Duration) -> Self {
        Self {
            success: false,
            message_id: None,
            duration,
            error: Some(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuditAttachment {
    pub filename: String,
}

/// One JSON file per send under `<log-root>/<contact>/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub message_id: String,
    pub duration_ms: u64,
    pub to: String,
    pub tutor_name: String,
    pub from: String,
    pub language: String,
    pub subject: String,
    pub body: String,
    pub html: String,
    pub attachments: Vec<AuditAttachment>,
}
