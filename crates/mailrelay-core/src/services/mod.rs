/// Side-effecting services used by the dispatch pipeline
pub mod audit;
pub mod janitor;
pub mod transport;

pub use audit::AuditLogger;
pub use janitor::TempFileJanitor;
pub use transport::{
    LettreConnector, MailTransport, SmtpMailTransport, SmtpSecurity, SmtpSettings,
    TransportConnector,
};
