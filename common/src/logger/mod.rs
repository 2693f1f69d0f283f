//! Logging setup shared by the workspace crates.

mod init;
mod spans;

pub use init::init_logger;
pub use spans::{loop_span, warn_if_slow};
