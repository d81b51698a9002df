//! Common test utilities and helpers for integration tests
#![allow(dead_code)]

use mailrelay_core::RelayConfig;
use mailrelay_core::models::{FileRole, RawEmailForm, UploadedFileRef};
use std::path::{Path, PathBuf};

pub mod mock_smtp;

/// Config with audit logs and uploads under the given directory
pub fn test_config(root: &Path) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.storage.log_dir = root.join("log");
    config.storage.upload_dir = root.join("uploads");
    config
}

/// A form that passes validation
pub fn valid_form() -> RawEmailForm {
    form_with(&[])
}

/// Valid form with some fields overridden; an empty value clears the field
pub fn form_with(overrides: &[(&str, &str)]) -> RawEmailForm {
    let mut form = RawEmailForm::default();
    for (name, value) in [
        ("to", "prof.chen@uni.edu"),
        ("subject", "PhD application"),
        ("body", "Dear Prof. Chen,\n\nPlease find my CV attached.\nBest,\nWei"),
        ("senderName", "Wei Zhang"),
        ("senderEmail", "wei@example.com"),
        ("senderPassword", "app-password"),
        ("smtpServer", "smtp.example.com"),
        ("smtpPort", "587"),
        ("tutorName", "Prof. Chen"),
        ("emailLanguage", "en"),
    ] {
        form.set_field(name, value.to_string());
    }
    for (name, value) in overrides {
        form.set_field(name, value.to_string());
    }
    form
}

/// Writes a fake PDF under `dir` and returns the upload handle for it
pub fn write_upload(dir: &Path, original_name: &str, role: FileRole) -> UploadedFileRef {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(uuid::Uuid::new_v4().to_string());
    std::fs::write(&path, b"%PDF-1.4\n%test\n").unwrap();

    UploadedFileRef {
        path,
        original_name: original_name.to_string(),
        content_type: "application/pdf".to_string(),
        size: 16,
        role,
    }
}

/// All audit files written under the log root, as (contact dir, parsed JSON)
pub fn audit_files(log_root: &Path) -> Vec<(String, serde_json::Value)> {
    let mut files = Vec::new();
    let Ok(dirs) = std::fs::read_dir(log_root) else {
        return files;
    };

    for dir in dirs.flatten() {
        let contact = dir.file_name().to_string_lossy().to_string();
        for file in std::fs::read_dir(dir.path()).unwrap().flatten() {
            let raw = std::fs::read_to_string(file.path()).unwrap();
            files.push((contact.clone(), serde_json::from_str(&raw).unwrap()));
        }
    }
    files
}

pub fn all_absent(paths: &[PathBuf]) -> bool {
    paths.iter().all(|p| !p.exists())
}
