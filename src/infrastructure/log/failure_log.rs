//! File-backed append-only failure log.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{error, warn};

use crate::domain::ports::{FailureLogPort, LogResult};

/// Appends failure entries to a fixed-path log file. Entries survive the
/// process; the settings screen reads and clears them.
pub struct FileFailureLog {
    path: PathBuf,
    // Serializes appends so interleaved entries stay line-atomic.
    writer: Mutex<()>,
}

impl FileFailureLog {
    /// Creates a log writing to `path`. The file itself is created lazily on
    /// first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks the log location is writable, creating parent directories as
    /// needed. A failure here is surfaced as a startup warning, not a fatal
    /// error.
    pub fn verify_writable(&self) -> bool {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(path = %self.path.display(), error = %e, "Cannot create log directory");
            return false;
        }
        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Log file is not writable");
                false
            }
        }
    }
}

impl FailureLogPort for FileFailureLog {
    fn append(&self, context: &str, message: &str) {
        let _guard = self.writer.lock();
        let line = format!("[{}] [{context}] {message}\n", Utc::now().to_rfc3339());
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = result {
            // A broken log must never take the pipeline down with it.
            error!(path = %self.path.display(), error = %e, "Failed to append to failure log");
        }
    }

    fn clear(&self) -> LogResult<()> {
        let _guard = self.writer.lock();
        std::fs::write(&self.path, b"")?;
        Ok(())
    }

    fn read_all(&self) -> Vec<String> {
        let _guard = self.writer.lock();
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content.lines().map(str::to_owned).collect(),
            Err(_) => Vec::new(),
        }
    }
}
