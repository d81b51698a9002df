/// Attachment assembly with dual-encoded filenames (RFC 2183 + RFC 5987)
use crate::config::LimitsConfig;
use crate::constants::{
    OTHER_DEFAULT_FILENAME_PREFIX, RESUME_DEFAULT_FILENAME, TRANSCRIPT_DEFAULT_FILENAME,
};
use crate::email::filename::FilenameNormalizer;
use crate::error::RelayError;
use crate::models::{Attachment, FileRole, UploadedFileRef};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

// encodeURIComponent minus `'()*`, which old mail clients choke on
const RFC5987_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~');

/// Percent-encodes a filename for the `filename*=UTF-8''` parameter
pub fn encode_rfc5987(name: &str) -> String {
    utf8_percent_encode(name, RFC5987_ENCODE_SET).to_string()
}

/// ASCII-only filename for clients that ignore `filename*`
pub fn ascii_fallback(name: &str, default_name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && !matches!(c, '"' | '\\'))
        .collect();

    let has_word_char = ascii
        .chars()
        .any(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if has_word_char {
        ascii
    } else {
        default_name.to_string()
    }
}

pub fn content_disposition(name: &str, default_name: &str) -> String {
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_fallback(name, default_name),
        encode_rfc5987(name)
    )
}

/// Role default, `n` is the 1-based position among other attachments
pub fn default_filename(role: FileRole, n: usize) -> String {
    match role {
        FileRole::Resume => RESUME_DEFAULT_FILENAME.to_string(),
        FileRole::Transcript => TRANSCRIPT_DEFAULT_FILENAME.to_string(),
        FileRole::Other => format!("{}{}.pdf", OTHER_DEFAULT_FILENAME_PREFIX, n),
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentAssembler {
    normalizer: FilenameNormalizer,
    limits: LimitsConfig,
}

impl AttachmentAssembler {
    pub fn new(limits: &LimitsConfig, normalizer: FilenameNormalizer) -> Self {
        Self {
            normalizer,
            limits: limits.clone(),
        }
    }

    /// Builds one attachment from an upload and its already-normalized name
    pub fn build(
        &self,
        upload: &UploadedFileRef,
        filename: &str,
        default_name: &str,
    ) -> Result<Attachment, RelayError> {
        if !self.limits.is_allowed_type(&upload.content_type) {
            return Err(RelayError::Validation(format!(
                "Only the following file types are allowed: {}",
                self.limits.allowed_file_types.join(", ")
            )));
        }

        Ok(Attachment {
            filename: filename.to_string(),
            content_type: upload.content_type.clone(),
            content_disposition: content_disposition(filename, default_name),
            path: upload.path.clone(),
        })
    }

    /// Orders uploads as resume, transcript, then others in upload order
    pub fn assemble(&self, uploads: &[UploadedFileRef]) -> Result<Vec<Attachment>, RelayError> {
        for role in [FileRole::Resume, FileRole::Transcript, FileRole::Other] {
            let count = uploads.iter().filter(|u| u.role == role).count();
            if count > role.max_count() {
                return Err(RelayError::Validation(format!(
                    "Too many files for '{}' (max {})",
                    role.field_name(),
                    role.max_count()
                )));
            }
        }

        let mut attachments = Vec::with_capacity(uploads.len());
        for role in [FileRole::Resume, FileRole::Transcript, FileRole::Other] {
            for (idx, upload) in uploads.iter().filter(|u| u.role == role).enumerate() {
                let default_name = default_filename(role, idx + 1);
                let original = if upload.original_name.is_empty() {
                    default_name.as_str()
                } else {
                    upload.original_name.as_str()
                };
                let filename = self.normalizer.normalize(original);
                let attachment = self.build(upload, &filename, &default_name)?;

                tracing::debug!(
                    role = role.field_name(),
                    filename = %attachment.filename,
                    size = upload.size,
                    "Added attachment"
                );
                attachments.push(attachment);
            }
        }

        Ok(attachments)
    }
}
