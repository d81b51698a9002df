/// Relay configuration - loaded once at startup from environment variables
use crate::constants::{
    DEFAULT_ALLOWED_FILE_TYPES, DEFAULT_CONNECTION_TIMEOUT, DEFAULT_CONTACT_SUFFIX,
    DEFAULT_FILENAME_ARTIFACT_CHARS, DEFAULT_GREETING_TIMEOUT, DEFAULT_MAX_BODY_LENGTH,
    DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MAX_FILES, DEFAULT_MAX_SUBJECT_LENGTH,
    DEFAULT_SOCKET_TIMEOUT,
};
use crate::error::RelayError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Immutable configuration shared by every request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub smtp: SmtpConfig,
    pub storage: StorageConfig,
    /// Latin-1 artifacts that mark a filename as mis-decoded
    pub filename_artifacts: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    #[serde(default)]
    pub enable_access_log: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    pub max_subject_length: usize,
    pub max_body_length: usize,
    /// Max size per uploaded file in bytes
    pub max_file_size: usize,
    pub max_files: usize,
    pub allowed_file_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub connection_timeout_ms: u64,
    pub greeting_timeout_ms: u64,
    pub socket_timeout_ms: u64,
    /// Skip certificate validation of the caller's SMTP server
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub log_dir: PathBuf,
    pub contact_suffix: String,
}

/// Timeouts applied to one SMTP transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportTimeouts {
    pub connection: Duration,
    pub greeting: Duration,
    pub socket: Duration,
}

impl Default for TransportTimeouts {
    fn default() -> Self {
        Self {
            connection: DEFAULT_CONNECTION_TIMEOUT,
            greeting: DEFAULT_GREETING_TIMEOUT,
            socket: DEFAULT_SOCKET_TIMEOUT,
        }
    }
}

impl SmtpConfig {
    pub fn timeouts(&self) -> TransportTimeouts {
        TransportTimeouts {
            connection: Duration::from_millis(self.connection_timeout_ms),
            greeting: Duration::from_millis(self.greeting_timeout_ms),
            socket: Duration::from_millis(self.socket_timeout_ms),
        }
    }
}

impl LimitsConfig {
    /// Returns true if the declared MIME type is on the allow-list
    pub fn is_allowed_type(&self, content_type: &str) -> bool {
        let essence = match content_type.parse::<mime::Mime>() {
            Ok(parsed) => parsed.essence_str().to_string(),
            Err(_) => return false,
        };
        self.allowed_file_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                log_level: "info".to_string(),
                enable_access_log: false,
            },
            limits: LimitsConfig {
                max_subject_length: DEFAULT_MAX_SUBJECT_LENGTH,
                max_body_length: DEFAULT_MAX_BODY_LENGTH,
                max_file_size: DEFAULT_MAX_FILE_SIZE_BYTES,
                max_files: DEFAULT_MAX_FILES,
                allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES
                    .iter()
                    .map(|t| t.to_string())
                    .collect(),
            },
            smtp: SmtpConfig {
                connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT.as_millis() as u64,
                greeting_timeout_ms: DEFAULT_GREETING_TIMEOUT.as_millis() as u64,
                socket_timeout_ms: DEFAULT_SOCKET_TIMEOUT.as_millis() as u64,
                accept_invalid_certs: true,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                log_dir: PathBuf::from("log"),
                contact_suffix: DEFAULT_CONTACT_SUFFIX.to_string(),
            },
            filename_artifacts: DEFAULT_FILENAME_ARTIFACT_CHARS.to_string(),
        }
    }
}

impl RelayConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_file_size_mb: usize = parse_or(
            get("MAX_FILE_SIZE_MB"),
            "MAX_FILE_SIZE_MB",
            defaults.limits.max_file_size / (1024 * 1024),
        )?;

        let allowed_file_types = match get("ALLOWED_FILE_TYPES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.limits.allowed_file_types.clone(),
        };

        let config = Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or(defaults.server.host),
                port: parse_or(get("PORT"), "PORT", defaults.server.port)?,
                log_level: get("LOG_LEVEL").unwrap_or(defaults.server.log_level),
                enable_access_log: get("ENABLE_ACCESS_LOG")
                    .map(|v| v.trim() == "true")
                    .unwrap_or(defaults.server.enable_access_log),
            },
            limits: LimitsConfig {
                max_subject_length: parse_or(
                    get("MAX_EMAIL_SUBJECT_LENGTH"),
                    "MAX_EMAIL_SUBJECT_LENGTH",
                    defaults.limits.max_subject_length,
                )?,
                max_body_length: parse_or(
                    get("MAX_EMAIL_CONTENT_LENGTH"),
                    "MAX_EMAIL_CONTENT_LENGTH",
                    defaults.limits.max_body_length,
                )?,
                max_file_size: max_file_size_mb * 1024 * 1024,
                max_files: parse_or(get("MAX_FILES"), "MAX_FILES", defaults.limits.max_files)?,
                allowed_file_types,
            },
            smtp: SmtpConfig {
                connection_timeout_ms: parse_or(
                    get("SMTP_CONNECTION_TIMEOUT_MS"),
                    "SMTP_CONNECTION_TIMEOUT_MS",
                    defaults.smtp.connection_timeout_ms,
                )?,
                greeting_timeout_ms: parse_or(
                    get("SMTP_GREETING_TIMEOUT_MS"),
                    "SMTP_GREETING_TIMEOUT_MS",
                    defaults.smtp.greeting_timeout_ms,
                )?,
                socket_timeout_ms: parse_or(
                    get("SMTP_SOCKET_TIMEOUT_MS"),
                    "SMTP_SOCKET_TIMEOUT_MS",
                    defaults.smtp.socket_timeout_ms,
                )?,
                accept_invalid_certs: parse_or(
                    get("SMTP_ACCEPT_INVALID_CERTS"),
                    "SMTP_ACCEPT_INVALID_CERTS",
                    defaults.smtp.accept_invalid_certs,
                )?,
            },
            storage: StorageConfig {
                upload_dir: get("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                log_dir: get("LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.log_dir),
                contact_suffix: lookup("AUDIT_CONTACT_SUFFIX")
                    .unwrap_or(defaults.storage.contact_suffix),
            },
            filename_artifacts: get("FILENAME_ARTIFACT_CHARS")
                .unwrap_or(defaults.filename_artifacts),
        };

        config
            .validate()
            .map_err(|e| RelayError::Config(format!("Invalid configuration: {}", e)))?;

        tracing::info!("Configuration validated successfully");

        Ok(config)
    }

    /// Validates configuration is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.limits.max_subject_length == 0 {
            return Err("MAX_EMAIL_SUBJECT_LENGTH must be > 0".to_string());
        }

        if self.limits.max_body_length == 0 {
            return Err("MAX_EMAIL_CONTENT_LENGTH must be > 0".to_string());
        }

        if self.limits.max_file_size == 0 {
            return Err("MAX_FILE_SIZE_MB must be > 0".to_string());
        }

        if self.limits.max_files == 0 {
            return Err("MAX_FILES must be > 0".to_string());
        }

        if self.limits.allowed_file_types.is_empty() {
            return Err("ALLOWED_FILE_TYPES must name at least one type".to_string());
        }

        for allowed in &self.limits.allowed_file_types {
            if allowed.parse::<mime::Mime>().is_err() {
                return Err(format!("Invalid MIME type in ALLOWED_FILE_TYPES: {}", allowed));
            }
        }

        if self.smtp.connection_timeout_ms == 0
            || self.smtp.greeting_timeout_ms == 0
            || self.smtp.socket_timeout_ms == 0
        {
            return Err("SMTP timeouts must be > 0".to_string());
        }

        if self.storage.upload_dir.as_os_str().is_empty() {
            return Err("UPLOAD_DIR must not be empty".to_string());
        }

        if self.storage.log_dir.as_os_str().is_empty() {
            return Err("LOG_DIR must not be empty".to_string());
        }

        Ok(())
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, RelayError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| RelayError::Config(format!("Invalid {} '{}': {}", key, value, e))),
        None => Ok(default),
    }
}
