//! HTTP tests for the send and health endpoints
mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    FilePart, MockSmtp, dir_is_empty, fields_without, send_request, valid_fields,
};
use mailrelay_api::ApiContext;
use mailrelay_core::constants::CONNECTIVITY_FAILED_MESSAGE;
use mailrelay_core::{RelayConfig, RelayError};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn test_config(root: &Path) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.storage.upload_dir = root.join("uploads");
    config.storage.log_dir = root.join("log");
    config
}

fn app(config: RelayConfig, smtp: &MockSmtp) -> Router {
    mailrelay_api::router(ApiContext::new(config, Arc::new(smtp.clone())))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = call(app(test_config(dir.path()), &MockSmtp::new()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], mailrelay_core::VERSION);
}

#[tokio::test]
async fn test_send_with_attachments() {
    let dir = tempfile::tempdir().unwrap();
    let smtp = MockSmtp::new();

    let request = send_request(
        &valid_fields(),
        &[
            FilePart::pdf("attachments", "publications.pdf"),
            FilePart::pdf("resume", "cv.pdf"),
        ],
    );
    let (status, json) = call(app(test_config(dir.path()), &smtp), request).await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Email sent successfully");
    assert!(json["messageId"].as_str().unwrap().ends_with("@example.com>"));
    assert!(json["duration"].is_u64());
    assert_eq!(smtp.sent_messages().len(), 1);
    assert!(dir_is_empty(&dir.path().join("uploads")));

    let contact_dir = dir.path().join("log").join("Prof. Chen_tutor");
    let entry = std::fs::read_dir(&contact_dir).unwrap().next().unwrap().unwrap();
    let record: Value =
        serde_json::from_str(&std::fs::read_to_string(entry.path()).unwrap()).unwrap();
    assert_eq!(record["attachments"][0]["filename"], "cv.pdf");
    assert_eq!(record["attachments"][1]["filename"], "publications.pdf");
}

#[tokio::test]
async fn test_untouched_file_inputs_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let smtp = MockSmtp::new();

    let empty = |field| FilePart {
        field,
        filename: "",
        content_type: "application/octet-stream",
        data: b"",
    };
    let request = send_request(
        &valid_fields(),
        &[
            FilePart::pdf("resume", "cv.pdf"),
            empty("transcript"),
            empty("attachments"),
        ],
    );
    let (status, json) = call(app(test_config(dir.path()), &smtp), request).await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["success"], true);
    assert_eq!(smtp.sent_messages().len(), 1);
    assert!(dir_is_empty(&dir.path().join("uploads")));

    let contact_dir = dir.path().join("log").join("Prof. Chen_tutor");
    let entry = std::fs::read_dir(&contact_dir).unwrap().next().unwrap().unwrap();
    let record: Value =
        serde_json::from_str(&std::fs::read_to_string(entry.path()).unwrap()).unwrap();
    assert_eq!(record["attachments"].as_array().unwrap().len(), 1);
    assert_eq!(record["attachments"][0]["filename"], "cv.pdf");
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let smtp = MockSmtp::new();

    let request = send_request(
        &fields_without("senderPassword"),
        &[FilePart::pdf("resume", "cv.pdf")],
    );
    let (status, json) = call(app(test_config(dir.path()), &smtp), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Missing required field: senderPassword");
    assert!(json.get("messageId").is_none());
    assert_eq!(smtp.connection_count(), 0);
    assert!(dir_is_empty(&dir.path().join("uploads")));
}

#[tokio::test]
async fn test_disallowed_type_is_rejected_at_intake() {
    let dir = tempfile::tempdir().unwrap();
    let smtp = MockSmtp::new();

    let png = FilePart {
        field: "attachments",
        filename: "photo.png",
        content_type: "image/png",
        data: b"\x89PNG",
    };
    let request = send_request(&valid_fields(), &[FilePart::pdf("resume", "cv.pdf"), png]);
    let (status, json) = call(app(test_config(dir.path()), &smtp), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("application/pdf"));
    assert_eq!(smtp.connection_count(), 0);
    assert!(dir_is_empty(&dir.path().join("uploads")));
}

#[tokio::test]
async fn test_second_resume_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let smtp = MockSmtp::new();

    let request = send_request(
        &valid_fields(),
        &[FilePart::pdf("resume", "a.pdf"), FilePart::pdf("resume", "b.pdf")],
    );
    let (status, json) = call(app(test_config(dir.path()), &smtp), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Too many files for 'resume' (max 1)");
    assert!(dir_is_empty(&dir.path().join("uploads")));
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let smtp = MockSmtp::new();
    let mut config = test_config(dir.path());
    config.limits.max_file_size = 8;

    let request = send_request(&valid_fields(), &[FilePart::pdf("resume", "cv.pdf")]);
    let (status, json) = call(app(config, &smtp), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("File too large"));
    assert_eq!(smtp.connection_count(), 0);
    assert!(dir_is_empty(&dir.path().join("uploads")));
}

#[tokio::test]
async fn test_smtp_unreachable_is_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let smtp = MockSmtp::failing_verify(RelayError::Connectivity(
        "Connection refused (os error 111)".to_string(),
    ));

    let request = send_request(&valid_fields(), &[FilePart::pdf("transcript", "grades.pdf")]);
    let (status, json) = call(app(test_config(dir.path()), &smtp), request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["message"], CONNECTIVITY_FAILED_MESSAGE);
    assert!(json["duration"].is_u64());
    assert!(dir_is_empty(&dir.path().join("uploads")));
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/api/send-email")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, json) = call(app(test_config(dir.path()), &MockSmtp::new()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_unknown_route_and_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();

    let response = app(test_config(dir.path()), &MockSmtp::new())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/send-email")
        .header(header::ORIGIN, "https://apply.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(test_config(dir.path()), &MockSmtp::new())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
