//! Logging utilities.
//!
//! This module centralizes logger initialization. Everything else in the
//! engine logs through the standard `log` facade.
//!
//! Two independent switches gate output: `info` covers info/debug/trace
//! records (written to stdout) and `error` covers warn/error records
//! (written to stderr). A disabled switch drops records before they are
//! formatted, so a failure path produces no output at all.

mod init;

pub use init::{LevelSwitches, LoggingConfig, init_logging};
