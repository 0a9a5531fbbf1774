//! Logging for ticktally
//!
//! File-based tracing output under `~/.ticktally/logs` with age-based
//! retention. The terminal is owned by the TUI, so nothing is logged to
//! stdout or stderr.

mod file_writer;
mod retention;

pub use file_writer::{init_file_logging, LogFileInfo, LoggingGuard};
pub use retention::{cleanup_old_logs, cleanup_old_logs_with_retention, DEFAULT_RETENTION_DAYS};

/// Prefix shared by every log file this crate writes
pub const LOG_FILE_PREFIX: &str = "ticktally-";
