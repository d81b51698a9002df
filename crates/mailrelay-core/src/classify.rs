/// Maps pipeline failures to an HTTP status and user-facing message
use crate::constants::{AUTH_FAILED_MESSAGE, CONNECTIVITY_FAILED_MESSAGE};
use crate::error::{ErrorKind, RelayError};
use http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub message: String,
}

/// Pure mapping by error kind; raw SMTP text never reaches the caller for
/// authentication or connectivity failures
pub fn classify(error: &RelayError) -> Classification {
    let kind = error.kind();
    let (status, message) = match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, error.to_string()),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, AUTH_FAILED_MESSAGE.to_string()),
        ErrorKind::Connectivity => (
            StatusCode::SERVICE_UNAVAILABLE,
            CONNECTIVITY_FAILED_MESSAGE.to_string(),
        ),
        ErrorKind::TransportRejection | ErrorKind::Internal => {
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    };

    Classification {
        kind,
        status,
        message,
    }
}
