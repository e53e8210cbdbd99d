//! Port definition for the durable failure log.

/// Result type for log maintenance operations.
pub type LogResult<T> = std::result::Result<T, LogError>;

/// Errors from the failure log backend.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// I/O failure on the log file.
    #[error("log io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-wide append-only failure log. Appends must never fail the
/// pipeline; implementations swallow their own write errors.
pub trait FailureLogPort: Send + Sync {
    /// Appends one failure entry.
    fn append(&self, context: &str, message: &str);

    /// Removes all entries. Restricted to privileged callers by the trigger
    /// surface.
    ///
    /// # Errors
    /// Returns [`LogError`] when the backing storage rejects the truncate.
    fn clear(&self) -> LogResult<()>;

    /// Reads every entry, oldest first.
    fn read_all(&self) -> Vec<String>;
}

#[cfg(test)]
pub mod mock {
    use parking_lot::Mutex;

    use super::*;

    /// In-memory failure log for tests.
    #[derive(Default)]
    pub struct MemoryFailureLog {
        entries: Mutex<Vec<String>>,
    }

    impl MemoryFailureLog {
        /// Creates an empty log.
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl FailureLogPort for MemoryFailureLog {
        fn append(&self, context: &str, message: &str) {
            self.entries.lock().push(format!("[{context}] {message}"));
        }

        fn clear(&self) -> LogResult<()> {
            self.entries.lock().clear();
            Ok(())
        }

        fn read_all(&self) -> Vec<String> {
            self.entries.lock().clone()
        }
    }
}
