/// Composed outgoing message and its attachments
use serde::Serialize;
use std::path::PathBuf;

/// Transport-ready attachment derived from an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    /// Full `Content-Disposition` value with ASCII and RFC 5987 filenames
    pub content_disposition: String,
    #[serde(skip)]
    pub path: PathBuf,
}

/// Sender mailbox as shown in the `From` header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub name: Option<String>,
    pub address: String,
}

impl Sender {
    /// Renders the header the way it is recorded in the audit log
    pub fn header(&self) -> String {
        match &self.name {
            Some(name) => format!("\"{}\" <{}>", name, self.address),
            None => format!("<{}>", self.address),
        }
    }

    pub fn domain(&self) -> &str {
        self.address.rsplit('@').next().unwrap_or("localhost")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub message_id: String,
    pub from: Sender,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}
