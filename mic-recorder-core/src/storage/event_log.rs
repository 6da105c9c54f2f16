//! Structured JSON event log kept on the active store.
//!
//! ```json
//! {"WARNINGS":[{"time":"2024-03-07 09:05:01","message":"..."}],"ERRORS":[]}
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::error::RecorderError;
use crate::models::timestamp::format_timestamp;
use crate::traits::storage_backend::{write_file, StorageBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(rename = "WARNINGS", default)]
    pub warnings: Vec<LogEntry>,
    #[serde(rename = "ERRORS", default)]
    pub errors: Vec<LogEntry>,
}

/// Create an empty log at `path` unless one already exists.
///
/// Returns `true` when a new file was written.
pub fn init_log_file(store: &dyn StorageBackend, path: &str) -> Result<bool, RecorderError> {
    if store.exists(path) {
        return Ok(false);
    }
    write_log(store, path, &EventLog::default()).map_err(|e| {
        log::error!("Failed to open log file for writing: {}", e);
        e
    })?;
    log::info!("Log file initialised at {} on {}", path, store.name());
    Ok(true)
}

pub fn read_log(store: &dyn StorageBackend, path: &str) -> Result<EventLog, RecorderError> {
    let bytes = store.read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| RecorderError::BackendUnavailable(format!("failed to parse log file: {}", e)))
}

/// Append one entry to the array for `level`, creating the log if needed.
pub fn append_entry(
    store: &dyn StorageBackend,
    path: &str,
    level: LogLevel,
    message: &str,
    time: &NaiveDateTime,
) -> Result<(), RecorderError> {
    init_log_file(store, path)?;

    let mut log = read_log(store, path)?;
    let entry = LogEntry {
        time: format_timestamp(time),
        message: message.to_string(),
    };
    match level {
        LogLevel::Warning => log.warnings.push(entry),
        LogLevel::Error => log.errors.push(entry),
    }
    write_log(store, path, &log)
}

fn write_log(store: &dyn StorageBackend, path: &str, log: &EventLog) -> Result<(), RecorderError> {
    let json = serde_json::to_vec(log)
        .map_err(|e| RecorderError::BackendUnavailable(format!("failed to serialize log file: {}", e)))?;
    write_file(store, path, &json)
}
