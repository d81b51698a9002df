/// Error types for Mailrelay
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("SMTP authentication error: {0}")]
    Authentication(String),

    #[error("SMTP connectivity error: {0}")]
    Connectivity(String),

    #[error("SMTP rejected the message: {0}")]
    TransportRejection(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure kinds that shape the response to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authentication,
    Connectivity,
    TransportRejection,
    Internal,
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Connectivity(_) => ErrorKind::Connectivity,
            Self::TransportRejection(_) => ErrorKind::TransportRejection,
            Self::Storage(_) | Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Determines if the caller may safely resubmit the same request
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Connectivity(_) => true,
            Self::Validation(_) => false,
            Self::Authentication(_) => false,
            Self::TransportRejection(_) => false,
            Self::Storage(_) => false,
            Self::Config(_) => false,
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retriable_errors() {
        assert!(RelayError::Connectivity("refused".to_string()).is_retriable());
        assert!(!RelayError::Authentication("535".to_string()).is_retriable());
        assert!(!RelayError::Validation("test".to_string()).is_retriable());
        assert!(!RelayError::TransportRejection("554".to_string()).is_retriable());
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            RelayError::Storage("disk full".to_string()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            RelayError::Connectivity("timeout".to_string()).kind(),
            ErrorKind::Connectivity
        );
    }

    #[test]
    fn test_error_display() {
        let err = RelayError::Validation("Missing required field: to".to_string());
        assert_eq!(err.to_string(), "Missing required field: to");

        let err = RelayError::Authentication("535 bad credentials".to_string());
        assert_eq!(
            err.to_string(),
            "SMTP authentication error: 535 bad credentials"
        );
    }
}
