//! Per-image failure types.
//!
//! Both kinds are isolated to one image: the processor records them into the
//! per-URL outcome and keeps going.

use thiserror::Error;

/// Failure to retrieve the source bytes of an image.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request timed out.
    #[error("fetching {url} timed out")]
    Timeout {
        /// The source URL.
        url: String,
    },

    /// The origin answered with a non-success status.
    #[error("fetching {url} failed with HTTP {status}")]
    Http {
        /// The source URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response does not look like an image.
    #[error("{url} returned non-image content type {content_type}")]
    NotAnImage {
        /// The source URL.
        url: String,
        /// Content type reported by the origin.
        content_type: String,
    },

    /// Transport-level failure.
    #[error("fetching {url} failed: {message}")]
    Network {
        /// The source URL.
        url: String,
        /// Transport detail.
        message: String,
    },
}

impl FetchError {
    /// Creates a transport failure.
    #[must_use]
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Failure to upload to the selected provider.
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// The provider rejected the upload and said why.
    #[error("provider rejected upload: {message}")]
    Provider {
        /// Provider-reported reason.
        message: String,
    },

    /// The provider answered but the payload was not understandable.
    #[error("unexpected provider response: {message}")]
    InvalidResponse {
        /// Parse detail.
        message: String,
    },

    /// Transport-level failure (timeout, connection, TLS).
    #[error("upload transport failure: {message}")]
    Transport {
        /// Transport detail.
        message: String,
    },
}

impl UploadError {
    /// Creates a provider-rejected error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
