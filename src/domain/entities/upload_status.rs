//! Persisted per-post upload status.

use serde::{Deserialize, Serialize};

/// Meta key holding the structured [`UploadStatus`] record.
pub const META_UPLOAD_STATUS: &str = "_iur_upload_status";

/// Meta key holding the last-processed timestamp. Written unconditionally on
/// every processing run so the bulk driver can do staleness checks.
pub const META_LAST_PROCESSED: &str = "_iur_last_processed";

/// Aggregate result of a processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Initial/display state. Never produced by a finished run.
    #[default]
    Pending,
    /// Every image uploaded and rewrote successfully.
    Success,
    /// Some images succeeded, some failed.
    Partial,
    /// No image succeeded.
    Failed,
}

impl StatusKind {
    /// Derives the aggregate status from a finished run's outcomes.
    ///
    /// A run with no images to process counts as a success: there was
    /// nothing left to migrate.
    #[must_use]
    pub fn derive(outcomes: &[UploadOutcome]) -> Self {
        if outcomes.is_empty() {
            return Self::Success;
        }
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        if succeeded == outcomes.len() {
            Self::Success
        } else if succeeded == 0 {
            Self::Failed
        } else {
            Self::Partial
        }
    }

    /// Returns true for a fully successful run.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Partial => write!(f, "partial"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome for one distinct original URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// The URL as it appeared in the post.
    pub original_url: String,
    /// The hosted replacement URL, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_url: Option<String>,
    /// Whether the upload and rewrite succeeded.
    pub success: bool,
    /// Why the image was skipped, when it was skipped rather than attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Failure detail, present when the fetch or upload failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn succeeded(original_url: impl Into<String>, uploaded_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            uploaded_url: Some(uploaded_url.into()),
            success: true,
            reason: None,
            error: None,
        }
    }

    /// Creates a failed outcome carrying the failure detail.
    #[must_use]
    pub fn failed(original_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            uploaded_url: None,
            success: false,
            reason: None,
            error: Some(error.into()),
        }
    }

    /// Creates a skipped outcome carrying the skip reason.
    #[must_use]
    pub fn skipped(original_url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            uploaded_url: None,
            success: false,
            reason: Some(reason.into()),
            error: None,
        }
    }
}

/// The durable record written against a post after every processing run.
///
/// Overwritten, never merged: rerunning the processor is the retry
/// mechanism, and already-migrated URLs are skipped by the extractor's
/// hosted-domain guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Aggregate status of the run.
    pub status: StatusKind,
    /// Provider the run uploaded to.
    pub service: String,
    /// One outcome per distinct original URL, in extraction order.
    pub images: Vec<UploadOutcome>,
}

impl UploadStatus {
    /// Builds the record from a finished run's outcomes, deriving the
    /// aggregate status.
    #[must_use]
    pub fn from_outcomes(service: impl Into<String>, images: Vec<UploadOutcome>) -> Self {
        Self {
            status: StatusKind::derive(&images),
            service: service.into(),
            images,
        }
    }
}
