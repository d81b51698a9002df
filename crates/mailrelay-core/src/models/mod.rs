/// Data models for the dispatch pipeline
pub mod message;
pub mod outcome;
pub mod request;
pub mod upload;

pub use message::*;
pub use outcome::*;
pub use request::*;
pub use upload::*;
