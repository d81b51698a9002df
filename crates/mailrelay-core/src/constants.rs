/// Application constants
///
/// Defaults for every tunable in `RelayConfig` plus the fixed values of the
/// dispatch pipeline.
use std::time::Duration;

// ============================================================================
// Form Limits
// ============================================================================

/// Default maximum subject length in characters
pub const DEFAULT_MAX_SUBJECT_LENGTH: usize = 200;

/// Default maximum plain-text body length in characters
pub const DEFAULT_MAX_BODY_LENGTH: usize = 50_000;

/// Default maximum size per uploaded file (10 MB)
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Default maximum number of uploaded files per request
pub const DEFAULT_MAX_FILES: usize = 20;

/// Default allow-list of upload MIME types
pub const DEFAULT_ALLOWED_FILE_TYPES: &[&str] = &["application/pdf"];

/// At most one resume per request
pub const MAX_RESUME_FILES: usize = 1;

/// At most one transcript per request
pub const MAX_TRANSCRIPT_FILES: usize = 1;

/// At most fifteen other attachments per request
pub const MAX_OTHER_FILES: usize = 15;

// ============================================================================
// SMTP Transport
// ============================================================================

/// Port that selects implicit TLS (SMTPS)
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Time allowed to open the TCP connection
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Time allowed for the server greeting
pub const DEFAULT_GREETING_TIMEOUT: Duration = Duration::from_secs(30);

/// Time allowed for each command on an open socket
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(60);

/// SMTP reply codes that mean the credential was rejected
pub const SMTP_AUTH_FAILURE_CODES: &[u16] = &[530, 534, 535, 538];

/// Temporary authentication failure, only meaningful while verifying
pub const SMTP_TEMP_AUTH_FAILURE_CODE: u16 = 454;

/// Service not available, closing transmission channel
pub const SMTP_SERVICE_UNAVAILABLE_CODE: u16 = 421;

// ============================================================================
// Filenames & Encoding
// ============================================================================

/// Characters that show up when UTF-8 bytes are rendered as Latin-1
pub const DEFAULT_FILENAME_ARTIFACT_CHARS: &str = "ÃÂåäæçèéíóú";

/// Fallback filename for the resume slot
pub const RESUME_DEFAULT_FILENAME: &str = "resume.pdf";

/// Fallback filename for the transcript slot
pub const TRANSCRIPT_DEFAULT_FILENAME: &str = "transcript.pdf";

/// Prefix of fallback filenames for other attachments (`attachment_<n>.pdf`)
pub const OTHER_DEFAULT_FILENAME_PREFIX: &str = "attachment_";

/// Characters removed from directory and file names
pub const PATH_UNSAFE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

// ============================================================================
// Message Body
// ============================================================================

/// Inline style of every paragraph in the derived HTML body
pub const HTML_PARAGRAPH_STYLE: &str = "margin:0 0 12px 0; line-height:1.6;";

// ============================================================================
// Audit Log
// ============================================================================

/// Suffix appended to every contact directory name
pub const DEFAULT_CONTACT_SUFFIX: &str = "_tutor";

/// Directory used when neither contact name nor recipient yield a name
pub const UNKNOWN_CONTACT_DIR: &str = "unknown_tutor";

/// Maximum characters of the subject kept in audit file names
pub const AUDIT_SUBJECT_EXCERPT_LENGTH: usize = 60;

/// Subject excerpt used when the sanitized subject is empty
pub const AUDIT_SUBJECT_FALLBACK: &str = "email";

// ============================================================================
// Responses & Logging
// ============================================================================

/// Message returned after a successful send
pub const SEND_SUCCESS_MESSAGE: &str = "Email sent successfully";

/// Message returned for any authentication failure
pub const AUTH_FAILED_MESSAGE: &str = "SMTP authentication failed, check address and credential";

/// Message returned for any connectivity failure
pub const CONNECTIVITY_FAILED_MESSAGE: &str =
    "SMTP server connection failed, check server settings";

/// Log target for audit events
pub const LOG_TARGET_AUDIT: &str = "audit";

/// Log target for temporary file cleanup
pub const LOG_TARGET_CLEANUP: &str = "cleanup";
