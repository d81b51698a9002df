/// Send endpoint: multipart intake followed by dispatch
use axum::{
    Json,
    extract::{
        State,
        multipart::{Field, Multipart, MultipartRejection},
    },
    http::StatusCode,
};
use mailrelay_core::RelayConfig;
use mailrelay_core::SendResponse;
use mailrelay_core::models::{FileRole, RawEmailForm, UploadedFileRef};
use mailrelay_core::services::TempFileJanitor;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::context::ApiContext;
use crate::error::ApiError;

const DEFAULT_UPLOAD_TYPE: &str = "application/octet-stream";

pub async fn handler(
    State(ctx): State<Arc<ApiContext>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<SendResponse>) {
    let start_time = Instant::now();
    let mut janitor = TempFileJanitor::new();

    let intake = match multipart {
        Ok(multipart) => receive_form(&ctx.config, multipart, &mut janitor).await,
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    };

    match intake {
        Ok((form, uploads)) => {
            let response = ctx.pipeline.dispatch_tracked(form, uploads, janitor).await;
            (response.status, Json(response.body))
        }
        Err(e) => {
            janitor.cleanup().await;
            warn!(status = e.status().as_u16(), error = %e, "Rejected send form");
            (
                e.status(),
                Json(SendResponse::failure(e.to_string(), start_time.elapsed())),
            )
        }
    }
}

/// Reads text fields into the form and streams file parts to the upload dir
///
/// Every file written is tracked by `janitor` before the first byte lands.
pub async fn receive_form(
    config: &RelayConfig,
    mut multipart: Multipart,
    janitor: &mut TempFileJanitor,
) -> Result<(RawEmailForm, Vec<UploadedFileRef>), ApiError> {
    let limits = &config.limits;
    let mut form = RawEmailForm::default();
    let mut uploads: Vec<UploadedFileRef> = Vec::new();
    let mut per_role: HashMap<FileRole, usize> = HashMap::new();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(original_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await?;
            if !form.set_field(&name, value) {
                debug!(field = %name, "Ignoring unknown form field");
            }
            continue;
        };

        // Browsers send an untouched file input as an empty, nameless part
        if original_name.is_empty() {
            while field.chunk().await?.is_some() {}
            debug!(field = %name, "Skipping empty file input");
            continue;
        }

        let Some(role) = FileRole::from_field_name(&name) else {
            return Err(ApiError::BadRequest(format!(
                "Unexpected file field: {}",
                name
            )));
        };

        let count = per_role.entry(role).or_default();
        *count += 1;
        if *count > role.max_count() {
            return Err(ApiError::BadRequest(format!(
                "Too many files for '{}' (max {})",
                role.field_name(),
                role.max_count()
            )));
        }
        if uploads.len() >= limits.max_files {
            return Err(ApiError::BadRequest(format!(
                "Too many files (max {})",
                limits.max_files
            )));
        }

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_UPLOAD_TYPE)
            .to_string();
        if !limits.is_allowed_type(&content_type) {
            return Err(ApiError::BadRequest(format!(
                "Only the following file types are allowed: {}",
                limits.allowed_file_types.join(", ")
            )));
        }

        tokio::fs::create_dir_all(&config.storage.upload_dir).await?;
        let path = config
            .storage
            .upload_dir
            .join(uuid::Uuid::new_v4().simple().to_string());
        janitor.track(&path);

        let size = store_field(field, &path, limits.max_file_size).await?;

        uploads.push(UploadedFileRef {
            path,
            original_name,
            content_type,
            size,
            role,
        });
    }

    Ok((form, uploads))
}

async fn store_field(mut field: Field<'_>, path: &Path, max_size: usize) -> Result<u64, ApiError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut size: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        if size > max_size as u64 {
            return Err(ApiError::BadRequest(format!(
                "File too large (max {} bytes)",
                max_size
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(size)
}
