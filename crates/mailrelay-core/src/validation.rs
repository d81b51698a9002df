/// Input validation for submitted send forms
use crate::config::LimitsConfig;
use crate::error::RelayError;
use crate::models::{EmailRequest, RawEmailForm};
use lettre::Address;
use regex::Regex;
use std::sync::LazyLock;

// Loose `local@domain.tld` shape
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email_shape(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Whether lettre can put the address in a header.
///
/// Stricter than [`is_valid_email_shape`]: `a(b)@x.com` has the right shape
/// but is rejected here, before any connection is opened.
pub fn is_deliverable_address(email: &str) -> bool {
    email.parse::<Address>().is_ok()
}

/// Fail-fast validator; the first failing check decides the message
#[derive(Debug, Clone)]
pub struct InputValidator {
    max_subject_length: usize,
    max_body_length: usize,
}

impl InputValidator {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            max_subject_length: limits.max_subject_length,
            max_body_length: limits.max_body_length,
        }
    }

    pub fn validate(&self, form: &RawEmailForm) -> Result<EmailRequest, RelayError> {
        let to = required("to", form.to.as_deref())?;
        let subject = required("subject", form.subject.as_deref())?;
        let body = required("body", form.body.as_deref())?;
        let sender_email = required("senderEmail", form.sender_email.as_deref())?;
        let sender_password = match &form.sender_password {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => return Err(missing("senderPassword")),
        };
        let smtp_host = required("smtpServer", form.smtp_server.as_deref())?;
        let smtp_port = required("smtpPort", form.smtp_port.as_deref())?;

        let (to, sender_email) = (to.trim(), sender_email.trim());
        if !is_valid_email_shape(to) || !is_valid_email_shape(sender_email) {
            return Err(RelayError::Validation(
                "Invalid email address format".to_string(),
            ));
        }
        if !is_deliverable_address(to) || !is_deliverable_address(sender_email) {
            return Err(RelayError::Validation(
                "Unsupported email address syntax".to_string(),
            ));
        }

        let smtp_port = parse_port(smtp_port)?;

        if subject.chars().count() > self.max_subject_length {
            return Err(RelayError::Validation(format!(
                "Subject too long (max {} characters)",
                self.max_subject_length
            )));
        }

        if body.chars().count() > self.max_body_length {
            return Err(RelayError::Validation(format!(
                "Body too long (max {} characters)",
                self.max_body_length
            )));
        }

        Ok(EmailRequest {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            sender_name: optional(form.sender_name.as_deref()),
            sender_email: sender_email.to_string(),
            sender_password,
            smtp_host: smtp_host.trim().to_string(),
            smtp_port,
            tutor_name: optional(form.tutor_name.as_deref()),
            language: optional(form.email_language.as_deref()),
        })
    }
}

fn missing(field: &str) -> RelayError {
    RelayError::Validation(format!("Missing required field: {}", field))
}

fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, RelayError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_port(raw: &str) -> Result<u16, RelayError> {
    let invalid = || RelayError::Validation(format!("Invalid SMTP port: {}", raw.trim()));
    let port: u32 = raw.trim().parse().map_err(|_| invalid())?;
    match u16::try_from(port) {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(invalid()),
    }
}
