/// Uploaded temporary files handed over by the intake layer
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logical slot an uploaded file was submitted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Resume,
    Transcript,
    Other,
}

impl FileRole {
    /// Maps a multipart field name to its role
    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "resume" => Some(Self::Resume),
            "transcript" => Some(Self::Transcript),
            "attachments" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Transcript => "transcript",
            Self::Other => "attachments",
        }
    }

    /// Maximum number of files accepted for this role
    pub fn max_count(&self) -> usize {
        match self {
            Self::Resume => crate::constants::MAX_RESUME_FILES,
            Self::Transcript => crate::constants::MAX_TRANSCRIPT_FILES,
            Self::Other => crate::constants::MAX_OTHER_FILES,
        }
    }
}

/// A file stored on disk for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadedFileRef {
    pub path: PathBuf,
    /// Client-supplied name, untrusted and possibly mis-encoded
    pub original_name: String,
    pub content_type: String,
    pub size: u64,
    pub role: FileRole,
}
