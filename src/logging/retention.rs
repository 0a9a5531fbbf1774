//! Age-based removal of old log files
//!
//! Only files named `ticktally-*.log` are considered. Anything else sharing
//! the directory is left alone.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use super::LOG_FILE_PREFIX;

/// How long a log file is kept, in days
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Remove log files older than [`DEFAULT_RETENTION_DAYS`], returning how
/// many went
pub fn cleanup_old_logs(logs_dir: &Path) -> Result<usize> {
    cleanup_old_logs_with_retention(logs_dir, DEFAULT_RETENTION_DAYS)
}

/// Remove log files last written more than `retention_days` ago
pub fn cleanup_old_logs_with_retention(logs_dir: &Path, retention_days: u64) -> Result<usize> {
    let max_age = Duration::from_secs(retention_days.saturating_mul(SECS_PER_DAY));
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = 0;
    for path in expired_logs(logs_dir, cutoff)? {
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed old log file {}", path.display());
                removed += 1;
            }
            Err(e) => tracing::debug!("Could not remove {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}

/// Own log files last modified at or before `cutoff`
fn expired_logs(logs_dir: &Path, cutoff: SystemTime) -> Result<Vec<PathBuf>> {
    if !logs_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(logs_dir)
        .with_context(|| format!("Failed to read {}", logs_dir.display()))?;
    Ok(entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_own_log_file(&entry.path()))
        .filter(|entry| {
            entry
                .metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified <= cutoff)
        })
        .map(|entry| entry.path())
        .collect())
}

fn is_own_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log"))
}
