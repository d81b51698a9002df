/// Per-send JSON audit records filed by contact
use crate::config::StorageConfig;
use crate::constants::{
    AUDIT_SUBJECT_EXCERPT_LENGTH, AUDIT_SUBJECT_FALLBACK, LOG_TARGET_AUDIT, UNKNOWN_CONTACT_DIR,
};
use crate::error::RelayError;
use crate::models::{AuditAttachment, AuditRecord, MailMessage, SendOutcome};
use crate::utils::path::{sanitize_for_path, sanitize_path_component};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Writes `<log-root>/<contact-dir>/<timestamp>_<subject>.json`
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_root: PathBuf,
    contact_suffix: String,
}

impl AuditLogger {
    pub fn new(log_root: impl Into<PathBuf>, contact_suffix: impl Into<String>) -> Self {
        Self {
            log_root: log_root.into(),
            contact_suffix: contact_suffix.into(),
        }
    }

    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(storage.log_dir.clone(), storage.contact_suffix.clone())
    }

    /// Directory name for a contact, falling back to the recipient's local part
    pub fn contact_dir_name(&self, contact_name: Option<&str>, recipient: &str) -> String {
        let mut name = sanitize_path_component(contact_name.unwrap_or_default());
        if name.is_empty() {
            let local_part = recipient.split('@').next().unwrap_or_default();
            name = sanitize_path_component(local_part);
        }

        if name.is_empty() {
            return UNKNOWN_CONTACT_DIR.to_string();
        }

        if !name.ends_with(&self.contact_suffix) {
            name.push_str(&self.contact_suffix);
        }
        name
    }

    pub fn build_record(
        &self,
        message: &MailMessage,
        outcome: &SendOutcome,
        contact_name: Option<&str>,
        language: Option<&str>,
    ) -> AuditRecord {
        AuditRecord {
            timestamp: Utc::now(),
            message_id: outcome
                .message_id
                .clone()
                .unwrap_or_else(|| message.message_id.clone()),
            duration_ms: outcome.duration.as_millis() as u64,
            to: message.to.clone(),
            tutor_name: contact_name.unwrap_or_default().to_string(),
            from: message.from.header(),
            language: language.unwrap_or_default().to_string(),
            subject: message.subject.clone(),
            body: message.text.clone(),
            html: message.html.clone(),
            attachments: message
                .attachments
                .iter()
                .map(|a| AuditAttachment {
                    filename: a.filename.clone(),
                })
                .collect(),
        }
    }

    /// Files the record for a successful send; failures are logged and swallowed
    pub async fn record(
        &self,
        message: &MailMessage,
        outcome: &SendOutcome,
        contact_name: Option<&str>,
        language: Option<&str>,
    ) -> Option<PathBuf> {
        if !outcome.success {
            tracing::debug!(target: LOG_TARGET_AUDIT, "Skipping audit record for failed send");
            return None;
        }

        let record = self.build_record(message, outcome, contact_name, language);
        let dir_name = self.contact_dir_name(contact_name, &message.to);

        match self.write(&record, &dir_name).await {
            Ok(path) => {
                tracing::info!(
                    target: LOG_TARGET_AUDIT,
                    path = %path.display(),
                    attachments = record.attachments.len(),
                    "Audit record written"
                );
                Some(path)
            }
            Err(e) => {
                tracing::warn!(
                    target: LOG_TARGET_AUDIT,
                    contact_dir = %dir_name,
                    error = %e,
                    "Failed to write audit record"
                );
                None
            }
        }
    }

    /// Writes the record without clobbering an existing file
    pub async fn write(&self, record: &AuditRecord, dir_name: &str) -> Result<PathBuf, RelayError> {
        let dir = self.log_root.join(dir_name);
        tokio::fs::create_dir_all(&dir).await?;

        let json = serde_json::to_vec_pretty(record)?;
        let stem = file_stem(record.timestamp, &record.subject);

        let path = dir.join(format!("{}.json", stem));
        match create_new(&path, &json).await {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == IoErrorKind::AlreadyExists => {
                let unique = uuid::Uuid::new_v4().simple().to_string();
                let path = dir.join(format!("{}_{}.json", stem, &unique[..8]));
                create_new(&path, &json).await?;
                Ok(path)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Sortable timestamp (colons replaced) plus a capped subject excerpt
pub fn file_stem(timestamp: DateTime<Utc>, subject: &str) -> String {
    let ts = timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");

    let excerpt: String = sanitize_for_path(subject)
        .chars()
        .take(AUDIT_SUBJECT_EXCERPT_LENGTH)
        .collect();
    let excerpt = excerpt.trim();

    if excerpt.is_empty() {
        format!("{}_{}", ts, AUDIT_SUBJECT_FALLBACK)
    } else {
        format!("{}_{}", ts, excerpt)
    }
}

async fn create_new(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(contents).await?;
    file.flush().await
}
