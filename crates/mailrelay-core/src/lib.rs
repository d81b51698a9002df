/// Mailrelay Core - dispatch pipeline for relaying web form submissions
///
/// This crate validates a submitted email, repairs and encodes attachment
/// filenames, relays the message through the caller's SMTP server, files an
/// audit record on disk and removes the uploaded temporary files.
pub mod classify;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod email;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use config::RelayConfig;
pub use dispatch::{DispatchPipeline, DispatchResponse, SendResponse};
pub use error::{ErrorKind, RelayError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
