/// In-memory SMTP server double
use async_trait::async_trait;
use lettre::Message;
use mailrelay_core::RelayError;
use mailrelay_core::services::{MailTransport, SmtpSettings, TransportConnector};
use std::sync::{Arc, Mutex};

/// Records every connection and sent message; failures are injected per phase
#[derive(Clone, Default)]
pub struct MockSmtp {
    pub connections: Arc<Mutex<Vec<SmtpSettings>>>,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub verify_error: Option<RelayError>,
    pub send_error: Option<RelayError>,
}

impl MockSmtp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_verify(error: RelayError) -> Self {
        Self {
            verify_error: Some(error),
            ..Self::default()
        }
    }

    pub fn failing_send(error: RelayError) -> Self {
        Self {
            send_error: Some(error),
            ..Self::default()
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    pub fn last_settings(&self) -> Option<SmtpSettings> {
        self.connections.lock().unwrap().last().cloned()
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl TransportConnector for MockSmtp {
    fn connect(&self, settings: &SmtpSettings) -> Result<Box<dyn MailTransport>, RelayError> {
        self.connections.lock().unwrap().push(settings.clone());
        Ok(Box::new(MockTransport {
            server: self.clone(),
        }))
    }
}

struct MockTransport {
    server: MockSmtp,
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn verify(&self) -> Result<(), RelayError> {
        match &self.server.verify_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn send(&self, message: Message) -> Result<String, RelayError> {
        if let Some(e) = &self.server.send_error {
            return Err(e.clone());
        }
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        self.server.sent.lock().unwrap().push(raw);
        Ok("250 2.0.0 OK queued".to_string())
    }
}
