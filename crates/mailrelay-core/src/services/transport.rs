/// SMTP transport to the caller's mail server
use crate::config::TransportTimeouts;
use crate::constants::{
    IMPLICIT_TLS_PORT, SMTP_AUTH_FAILURE_CODES, SMTP_SERVICE_UNAVAILABLE_CODE,
    SMTP_TEMP_AUTH_FAILURE_CODE,
};
use crate::error::{ErrorKind, RelayError};
use crate::models::Secret;
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use typed_builder::TypedBuilder;

/// How the connection is secured, decided by the port alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS, port 465)
    ImplicitTls,
    /// Plain connection upgraded with STARTTLS when the server offers it
    Opportunistic,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct SmtpSettings {
    #[builder(setter(into))]
    pub host: String,
    pub port: u16,
    #[builder(setter(into))]
    pub username: String,
    pub credential: Secret,
    #[builder(default)]
    pub timeouts: TransportTimeouts,
    /// Accept self-signed or mismatched certificates
    #[builder(default = true)]
    pub accept_invalid_certs: bool,
}

impl SmtpSettings {
    pub fn security(&self) -> SmtpSecurity {
        if self.port == IMPLICIT_TLS_PORT {
            SmtpSecurity::ImplicitTls
        } else {
            SmtpSecurity::Opportunistic
        }
    }

    /// Upper bound for connect plus greeting during verification
    pub fn handshake_timeout(&self) -> Duration {
        self.timeouts.connection + self.timeouts.greeting
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Connects, authenticates and probes the server without sending
    async fn verify(&self) -> Result<(), RelayError>;

    /// Sends the message and returns the server's reply
    async fn send(&self, message: Message) -> Result<String, RelayError>;
}

/// Opens transports; the seam tests replace with an in-memory double
pub trait TransportConnector: Send + Sync {
    fn connect(&self, settings: &SmtpSettings) -> Result<Box<dyn MailTransport>, RelayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpPhase {
    Verify,
    Send,
}

/// Decides the failure kind from what the SMTP client observed
pub fn smtp_failure_kind(phase: SmtpPhase, timed_out: bool, code: Option<u16>) -> ErrorKind {
    if timed_out {
        return ErrorKind::Connectivity;
    }

    match code {
        None => ErrorKind::Connectivity,
        Some(code) if SMTP_AUTH_FAILURE_CODES.contains(&code) => ErrorKind::Authentication,
        Some(SMTP_TEMP_AUTH_FAILURE_CODE) if phase == SmtpPhase::Verify => {
            ErrorKind::Authentication
        }
        Some(SMTP_SERVICE_UNAVAILABLE_CODE) if phase == SmtpPhase::Verify => {
            ErrorKind::Connectivity
        }
        Some(_) => ErrorKind::TransportRejection,
    }
}

fn map_smtp_error(err: lettre::transport::smtp::Error, phase: SmtpPhase) -> RelayError {
    let code = err.status().map(u16::from);
    let message = err.to_string();

    match smtp_failure_kind(phase, err.is_timeout(), code) {
        ErrorKind::Authentication => RelayError::Authentication(message),
        ErrorKind::Connectivity => RelayError::Connectivity(message),
        _ => RelayError::TransportRejection(message),
    }
}

/// lettre-backed transport, one connection per verify and per send
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    endpoint: String,
    handshake_timeout: Duration,
}

impl SmtpMailTransport {
    pub fn new(settings: &SmtpSettings) -> Result<Self, RelayError> {
        let tls_parameters = TlsParameters::builder(settings.host.clone())
            .dangerous_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| {
                RelayError::Connectivity(format!("Failed to prepare TLS parameters: {}", e))
            })?;

        let tls = match settings.security() {
            SmtpSecurity::ImplicitTls => Tls::Wrapper(tls_parameters),
            SmtpSecurity::Opportunistic => Tls::Opportunistic(tls_parameters),
        };

        if settings.accept_invalid_certs {
            tracing::debug!(host = %settings.host, "TLS certificate validation disabled for SMTP server");
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .tls(tls)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.credential.expose().to_string(),
            ))
            .timeout(Some(settings.timeouts.socket))
            .build();

        Ok(Self {
            transport,
            endpoint: format!("{}:{}", settings.host, settings.port),
            handshake_timeout: settings.handshake_timeout(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn verify(&self) -> Result<(), RelayError> {
        match tokio::time::timeout(self.handshake_timeout, self.transport.test_connection()).await
        {
            Err(_) => Err(RelayError::Connectivity(format!(
                "Connection timeout after {:?} to {}",
                self.handshake_timeout, self.endpoint
            ))),
            Ok(Ok(true)) => {
                tracing::debug!(endpoint = %self.endpoint, "SMTP connection verified");
                Ok(())
            }
            Ok(Ok(false)) => Err(RelayError::Connectivity(format!(
                "{} did not answer the connection probe",
                self.endpoint
            ))),
            Ok(Err(e)) => Err(map_smtp_error(e, SmtpPhase::Verify)),
        }
    }

    async fn send(&self, message: Message) -> Result<String, RelayError> {
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| map_smtp_error(e, SmtpPhase::Send))?;

        Ok(format!(
            "{} {}",
            response.code(),
            response.first_line().unwrap_or_default()
        ))
    }
}

/// Connector used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct LettreConnector;

impl TransportConnector for LettreConnector {
    fn connect(&self, settings: &SmtpSettings) -> Result<Box<dyn MailTransport>, RelayError> {
        Ok(Box::new(SmtpMailTransport::new(settings)?))
    }
}
