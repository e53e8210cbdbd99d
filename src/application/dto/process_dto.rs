//! Payload shapes returned by the trigger surface.

use serde::{Deserialize, Serialize};

use crate::domain::entities::PostId;
use crate::domain::errors::ProcessError;

/// Success payload of a single-post processing call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    /// Number of URLs rewritten to hosted copies.
    pub replaced: usize,
    /// Non-fatal notes (best-effort deletion failures and the like).
    pub warnings: Vec<String>,
    /// Per-image failure messages.
    pub errors: Vec<String>,
}

impl ProcessReport {
    /// Records a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Records a per-image error.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Failure payload of the trigger surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePayload {
    /// Human-readable failure message.
    pub message: String,
    /// HTTP-equivalent status code.
    pub code: u16,
}

impl From<&ProcessError> for FailurePayload {
    fn from(e: &ProcessError) -> Self {
        Self {
            message: e.to_string(),
            code: e.code(),
        }
    }
}

/// Aggregate result of a bulk pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    /// Posts actually processed.
    pub processed: usize,
    /// Posts skipped (already migrated, or stale status said so).
    pub skipped: usize,
    /// Total URLs rewritten across the pass.
    pub replaced: usize,
    /// Whether the pass was cancelled at a group boundary.
    pub cancelled: bool,
    /// Call-level failures, one per affected post.
    pub failures: Vec<BulkFailure>,
}

/// One post's call-level failure during a bulk pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    /// The post that failed.
    pub post_id: PostId,
    /// Failure message.
    pub message: String,
}
