//! Durable failure log.

mod failure_log;

pub use failure_log::FileFailureLog;
