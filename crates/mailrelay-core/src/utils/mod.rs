/// Utility modules
pub mod logging;
pub mod path;

pub use logging::*;
pub use path::*;
