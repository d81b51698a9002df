/// Health check endpoint
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Liveness only; SMTP servers are per request and not probed here
pub async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: mailrelay_core::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
