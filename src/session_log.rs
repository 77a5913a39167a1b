// src/session_log.rs

//! Append-only session log.
//!
//! Every record is an independent open-append-close cycle, so the log can be
//! shared by the driver and both output readers of an interactive session
//! without a lock. A failed append is reported on the operator log and
//! otherwise swallowed: recording must never abort command execution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use crate::fs::{FileSystem, RealFileSystem};

#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    /// Session log backed by the real filesystem.
    pub fn on_disk(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Arc::new(RealFileSystem))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `message` as one record. A trailing newline is added if missing.
    pub fn append(&self, message: &str) {
        let mut record = message.to_string();
        if !record.ends_with('\n') {
            record.push('\n');
        }

        // Blocking write on purpose: records are single short lines, and the
        // output readers call this from inside their own tasks.
        if let Err(err) = self.fs.append(&self.path, record.as_bytes()) {
            warn!(
                path = ?self.path,
                error = %err,
                "failed to write to session log"
            );
        }
    }
}

/// Current UTC time in RFC 3339, for record timestamps.
pub fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}
