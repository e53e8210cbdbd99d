//! Call-level processing errors.

use thiserror::Error;

use crate::domain::entities::PostId;

/// Errors that abort a whole `process_post` call. Per-image failures are
/// captured into the status record instead and never surface here.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The selected provider has no usable credentials.
    #[error("configuration error: {message}")]
    Config {
        /// What is missing or invalid.
        message: String,
    },

    /// The post id does not resolve to an eligible content item.
    #[error("post {post_id} not found or not eligible for processing")]
    NotFound {
        /// The offending post id.
        post_id: PostId,
    },

    /// The content store rejected a read or write.
    #[error("content store error: {message}")]
    Store {
        /// Collaborator-reported detail.
        message: String,
    },
}

impl ProcessError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub const fn not_found(post_id: PostId) -> Self {
        Self::NotFound { post_id }
    }

    /// Creates a content store error.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// HTTP-equivalent status code for the failure payload.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Config { .. } | Self::Store { .. } => 500,
        }
    }
}
