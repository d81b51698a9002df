/// Submitted email fields, before and after validation
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw text fields of the send form, keyed by their form names
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmailForm {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_password: Option<Secret>,
    pub smtp_server: Option<String>,
    pub smtp_port: Option<String>,
    pub tutor_name: Option<String>,
    pub email_language: Option<String>,
}

impl RawEmailForm {
    /// Stores a text field by its form name; unknown names are ignored
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "to" => &mut self.to,
            "subject" => &mut self.subject,
            "body" => &mut self.body,
            "senderName" => &mut self.sender_name,
            "senderEmail" => &mut self.sender_email,
            "senderPassword" => {
                self.sender_password = Some(Secret::new(value));
                return true;
            }
            "smtpServer" => &mut self.smtp_server,
            "smtpPort" => &mut self.smtp_port,
            "tutorName" => &mut self.tutor_name,
            "emailLanguage" => &mut self.email_language,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Opaque credential that never prints its value
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// A request that passed every input check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub sender_name: Option<String>,
    pub sender_email: String,
    pub sender_password: Secret,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub tutor_name: Option<String>,
    pub language: Option<String>,
}
