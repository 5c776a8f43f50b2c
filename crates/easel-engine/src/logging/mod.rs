//! Logging utilities.
//!
//! Logger initialization for binaries and tests. The library itself only
//! emits through the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
