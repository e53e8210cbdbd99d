//! Port definition for third-party image hosts.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::Quality;
use crate::domain::errors::UploadError;

/// Domains the supported providers serve uploads from. URLs already pointing
/// here are considered migrated and are never re-uploaded.
pub const HOSTED_DOMAINS: &[&str] = &[
    "freeimage.host",
    "iili.io",
    "ibb.co",
    "i.ibb.co",
    "res.cloudinary.com",
];

/// Returns true when the URL's host belongs to a known provider domain.
#[must_use]
pub fn is_hosted_url(url: &str) -> bool {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(rest)
        .split('@')
        .next_back()
        .unwrap_or(rest)
        .split(':')
        .next()
        .unwrap_or(rest);

    HOSTED_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

/// Port over one third-party image host. Two-outcome contract: a hosted URL
/// or a typed failure. Retry policy belongs to the caller.
#[async_trait]
pub trait ImageHostPort: Send + Sync {
    /// Provider name as persisted in status records.
    fn service_name(&self) -> &'static str;

    /// Uploads raw image bytes and returns the hosted URL.
    ///
    /// # Errors
    /// Returns [`UploadError`] when the provider rejects the upload or the
    /// transport fails.
    async fn upload(
        &self,
        bytes: Bytes,
        filename: &str,
        quality: Quality,
    ) -> Result<String, UploadError>;
}
