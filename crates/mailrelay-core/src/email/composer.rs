/// Email composer using lettre crate
use crate::email::html::text_to_html;
use crate::error::RelayError;
use crate::models::{Attachment, EmailRequest, MailMessage, Sender};
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::{Mailbox, Message, MultiPart, SinglePart};

/// `Content-Disposition` emitted verbatim, lettre's own builder only knows `filename=`
#[derive(Debug, Clone)]
struct RawContentDisposition(String);

impl Header for RawContentDisposition {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Disposition")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageComposer;

impl MessageComposer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the message model with a fresh `<uuid@sender-domain>` id
    pub fn prepare(&self, request: &EmailRequest, attachments: Vec<Attachment>) -> MailMessage {
        let from = Sender {
            name: request.sender_name.clone(),
            address: request.sender_email.clone(),
        };
        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4(), from.domain());

        MailMessage {
            message_id,
            from,
            to: request.to.clone(),
            subject: request.subject.clone(),
            text: request.body.clone(),
            html: text_to_html(&request.body),
            attachments,
        }
    }

    /// Reads attachment bodies from disk and builds the MIME message
    pub async fn compose(&self, message: &MailMessage) -> Result<Message, RelayError> {
        let from = Mailbox::new(
            message.from.name.clone(),
            message.from.address.parse().map_err(|e| {
                RelayError::Validation(format!("Invalid sender address: {}", e))
            })?,
        );
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| RelayError::Validation(format!("Invalid recipient address: {}", e)))?;

        let builder = Message::builder()
            .message_id(Some(message.message_id.clone()))
            .from(from)
            .to(to)
            .subject(&message.subject);

        let alternative = MultiPart::alternative()
            .singlepart(SinglePart::plain(message.text.clone()))
            .singlepart(SinglePart::html(message.html.clone()));

        let built = if message.attachments.is_empty() {
            builder.multipart(alternative)
        } else {
            let mut mixed = MultiPart::mixed().multipart(alternative);
            for attachment in &message.attachments {
                mixed = mixed.singlepart(self.attachment_part(attachment).await?);
            }
            builder.multipart(mixed)
        };

        let email = built.map_err(|e| {
            RelayError::Validation(format!("Failed to build message: {}", e))
        })?;

        tracing::debug!(
            message_id = %message.message_id,
            attachments = message.attachments.len(),
            "Composed message"
        );

        Ok(email)
    }

    async fn attachment_part(&self, attachment: &Attachment) -> Result<SinglePart, RelayError> {
        let data = tokio::fs::read(&attachment.path).await.map_err(|e| {
            RelayError::Storage(format!(
                "Failed to read attachment {}: {}",
                attachment.filename, e
            ))
        })?;

        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            RelayError::Validation(format!(
                "Invalid content type '{}': {}",
                attachment.content_type, e
            ))
        })?;

        Ok(SinglePart::builder()
            .header(content_type)
            .header(RawContentDisposition(attachment.content_disposition.clone()))
            .body(data))
    }
}
