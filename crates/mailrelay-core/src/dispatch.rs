/// Dispatch pipeline: one submitted form in, one classified response out
use crate::classify::classify;
use crate::config::{RelayConfig, TransportTimeouts};
use crate::constants::SEND_SUCCESS_MESSAGE;
use crate::email::{AttachmentAssembler, FilenameNormalizer, MessageComposer};
use crate::error::RelayError;
use crate::models::{EmailRequest, RawEmailForm, SendOutcome, UploadedFileRef};
use crate::services::{AuditLogger, SmtpSettings, TempFileJanitor, TransportConnector};
use crate::utils::logging::{extract_domain, redact_email, redact_subject};
use crate::validation::InputValidator;
use http::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// JSON body returned to the caller for every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Elapsed milliseconds
    pub duration: u64,
}

impl SendResponse {
    pub fn failure(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            success: false,
            message: message.into(),
            message_id: None,
            duration: duration.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub body: SendResponse,
    pub outcome: SendOutcome,
}

impl DispatchResponse {
    fn sent(message_id: String, duration: Duration) -> Self {
        Self {
            status: StatusCode::OK,
            body: SendResponse {
                success: true,
                message: SEND_SUCCESS_MESSAGE.to_string(),
                message_id: Some(message_id.clone()),
                duration: duration.as_millis() as u64,
            },
            outcome: SendOutcome::sent(message_id, duration),
        }
    }

    fn failed(error: &RelayError, duration: Duration) -> Self {
        let classification = classify(error);
        Self {
            status: classification.status,
            body: SendResponse::failure(classification.message, duration),
            outcome: SendOutcome::failed(classification.kind, duration),
        }
    }
}

/// Runs validate, connect, verify, assemble, send, audit and cleanup
///
/// Built once at startup from an immutable [`RelayConfig`] and shared across
/// requests; it holds no per-request state.
pub struct DispatchPipeline {
    validator: InputValidator,
    assembler: AttachmentAssembler,
    composer: MessageComposer,
    audit: AuditLogger,
    connector: Arc<dyn TransportConnector>,
    timeouts: TransportTimeouts,
    accept_invalid_certs: bool,
}

impl DispatchPipeline {
    pub fn new(config: &RelayConfig, connector: Arc<dyn TransportConnector>) -> Self {
        Self {
            validator: InputValidator::new(&config.limits),
            assembler: AttachmentAssembler::new(
                &config.limits,
                FilenameNormalizer::new(&config.filename_artifacts),
            ),
            composer: MessageComposer::new(),
            audit: AuditLogger::from_config(&config.storage),
            connector,
            timeouts: config.smtp.timeouts(),
            accept_invalid_certs: config.smtp.accept_invalid_certs,
        }
    }

    pub async fn dispatch(
        &self,
        form: RawEmailForm,
        uploads: Vec<UploadedFileRef>,
    ) -> DispatchResponse {
        self.dispatch_tracked(form, uploads, TempFileJanitor::new())
            .await
    }

    /// Same as [`dispatch`](Self::dispatch) with a janitor the intake layer already filled
    pub async fn dispatch_tracked(
        &self,
        form: RawEmailForm,
        uploads: Vec<UploadedFileRef>,
        mut janitor: TempFileJanitor,
    ) -> DispatchResponse {
        let start_time = Instant::now();
        for upload in &uploads {
            janitor.track(&upload.path);
        }

        let result = self.process(&form, &uploads, start_time).await;

        // Runs on every exit path
        janitor.cleanup().await;

        let duration = start_time.elapsed();
        match result {
            Ok(message_id) => DispatchResponse::sent(message_id, duration),
            Err(e) => {
                let response = DispatchResponse::failed(&e, duration);
                warn!(
                    status = response.status.as_u16(),
                    kind = ?e.kind(),
                    retriable = e.is_retriable(),
                    error = %redact_email(&e.to_string()),
                    duration_ms = response.body.duration,
                    "Dispatch failed"
                );
                response
            }
        }
    }

    #[tracing::instrument(name = "dispatch.process", skip_all, fields(uploads = uploads.len()))]
    async fn process(
        &self,
        form: &RawEmailForm,
        uploads: &[UploadedFileRef],
        start_time: Instant,
    ) -> Result<String, RelayError> {
        // 1. Validate before any network I/O
        let request = self.validator.validate(form)?;
        info!(
            to = %redact_email(&request.to),
            sender_domain = extract_domain(&request.sender_email),
            smtp_host = %request.smtp_host,
            smtp_port = request.smtp_port,
            subject = %redact_subject(&request.subject),
            "Dispatching email"
        );

        // 2. Connect and verify the caller's SMTP server
        let transport = self.connector.connect(&self.smtp_settings(&request))?;
        transport.verify().await?;

        // 3. Attachments: resume, transcript, then others
        let attachments = self.assembler.assemble(uploads)?;

        // 4. Compose
        let message = self.composer.prepare(&request, attachments);
        let email = self.composer.compose(&message).await?;

        // 5. Send
        let reply = transport.send(email).await?;
        let outcome = SendOutcome::sent(message.message_id.clone(), start_time.elapsed());
        info!(
            message_id = %message.message_id,
            reply = %reply,
            attachments = message.attachments.len(),
            duration_ms = outcome.duration.as_millis() as u64,
            "Email sent"
        );

        // 6. Audit, best-effort
        self.audit
            .record(
                &message,
                &outcome,
                request.tutor_name.as_deref(),
                request.language.as_deref(),
            )
            .await;

        Ok(message.message_id)
    }

    fn smtp_settings(&self, request: &EmailRequest) -> SmtpSettings {
        SmtpSettings::builder()
            .host(request.smtp_host.clone())
            .port(request.smtp_port)
            .username(request.sender_email.clone())
            .credential(request.sender_password.clone())
            .timeouts(self.timeouts)
            .accept_invalid_certs(self.accept_invalid_certs)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_response_shape() {
        let ok = DispatchResponse::sent("<id@example.com>".to_string(), Duration::from_millis(42));
        let json = serde_json::to_value(&ok.body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], SEND_SUCCESS_MESSAGE);
        assert_eq!(json["messageId"], "<id@example.com>");
        assert_eq!(json["duration"], 42);

        let failed = DispatchResponse::failed(
            &RelayError::Validation("Missing required field: to".to_string()),
            Duration::from_millis(1),
        );
        assert_eq!(failed.status, StatusCode::BAD_REQUEST);
        let json = serde_json::to_value(&failed.body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("messageId").is_none());
        assert!(!failed.outcome.success);
    }
}
