//! Logging utilities.
//!
//! Centralizes logger initialization so applications and tests get consistent
//! diagnostics. Only the `log` facade is used inside the engine; `env_logger`
//! is wired up here and nowhere else.

mod init;

pub use init::{LoggingConfig, init_logging};
