//! Logger setup.
//!
//! Everything in the engine logs through the `log` facade; binaries call
//! [`init_logging`] once at startup to install `env_logger`.

mod init;

pub use init::{LoggingConfig, init_logging};
