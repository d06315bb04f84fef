// Transfer log: an append-only JSON record of every file handed to the
// CDN. Each entry stores the original path, the hash the file was
// published under, and a wall-clock timestamp. The whole collection is
// rewritten on every append; there is no locking, so concurrent runs
// against the same log file can race (accepted for this tool's scope).

use crate::hash;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One transfer record. Immutable once appended.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub original_file_name: String,
    pub hash_value: String,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

/// Handle to the on-disk JSON log. Holds only the path; every call
/// re-reads the file so the log stays the single source of truth.
pub struct TransferLog {
    path: PathBuf,
}

impl Default for TransferLog {
    fn default() -> Self {
        TransferLog::new("cdn_log.json")
    }
}

impl TransferLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TransferLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection. A missing file is an empty log, but a
    /// file that exists and fails to parse is fatal: no silent repair.
    pub fn load(&self) -> Result<Vec<LogEntry>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read log {}", self.path.display()))
            }
        };
        serde_json::from_str(&data)
            .with_context(|| format!("Malformed transfer log {}", self.path.display()))
    }

    /// Append an entry for `file_path` under `hash_value`, rehashing
    /// until the stored hash is unique within the log. Returns the hash
    /// actually stored, which differs from the input on collision.
    pub fn record(&self, file_path: &str, hash_value: &str) -> Result<String> {
        let mut entries = self.load()?;

        // Collision mitigation: derive a new identity from the path
        // plus a fresh timestamp until it no longer clashes.
        let mut stored = hash_value.to_string();
        while entries.iter().any(|e| e.hash_value == stored) {
            stored = hash::digest(&format!("{}{}", file_path, unix_now()));
        }

        entries.push(LogEntry {
            original_file_name: file_path.to_string(),
            hash_value: stored.clone(),
            timestamp: unix_now(),
        });

        let json = serde_json::to_string_pretty(&entries).context("Serializing transfer log")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write log {}", self.path.display()))?;
        Ok(stored)
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
