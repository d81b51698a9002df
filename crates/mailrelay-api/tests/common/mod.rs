//! Common helpers for HTTP-level tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, header};

#[path = "../../../mailrelay-core/tests/common/mock_smtp.rs"]
mod mock_smtp;

pub use mock_smtp::MockSmtp;

pub const BOUNDARY: &str = "----mailrelay-test-boundary";

/// One uploaded file part
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FilePart<'a> {
    pub fn pdf(field: &'a str, filename: &'a str) -> Self {
        Self {
            field,
            filename,
            content_type: "application/pdf",
            data: b"%PDF-1.4\n%test\n",
        }
    }
}

pub fn multipart_body(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    for file in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn send_request(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/send-email")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(fields, files)))
        .unwrap()
}

pub fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("to", "prof.chen@uni.edu"),
        ("subject", "PhD application"),
        ("body", "Dear Prof. Chen,\n\nPlease find my CV attached."),
        ("senderName", "Wei Zhang"),
        ("senderEmail", "wei@example.com"),
        ("senderPassword", "app-password"),
        ("smtpServer", "smtp.example.com"),
        ("smtpPort", "587"),
        ("tutorName", "Prof. Chen"),
        ("emailLanguage", "en"),
    ]
}

/// Valid fields minus one
pub fn fields_without(name: &str) -> Vec<(&'static str, &'static str)> {
    valid_fields().into_iter().filter(|(n, _)| *n != name).collect()
}

pub fn dir_is_empty(dir: &std::path::Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}
