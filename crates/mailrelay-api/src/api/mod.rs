/// API endpoint modules
pub mod health;
pub mod send;

use crate::error::ApiError;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
