//! Logging setup.
//!
//! Everything else in the crate only uses the `log` facade; this module wires
//! it to `env_logger`.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
