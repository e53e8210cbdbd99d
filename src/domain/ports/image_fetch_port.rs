//! Port definition for retrieving source image bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Raw image bytes pulled from the origin.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// The image payload.
    pub bytes: Bytes,
    /// Content type reported by the origin, if any.
    pub content_type: Option<String>,
    /// Filename derived from the URL path, used for upload forms.
    pub filename: String,
}

/// Port for fetching the source bytes behind an image URL. Every
/// implementation must bound its network calls with a timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the image at `url`.
    ///
    /// # Errors
    /// Returns [`FetchError`] on timeout, transport failure, non-success
    /// status, or a response that is not an image.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError>;
}

/// Derives an upload filename from the last URL path segment.
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');
    let name = path.rsplit('/').next().unwrap_or("image");
    if name.is_empty() || name.starts_with("http") {
        "image".to_owned()
    } else {
        name.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_is_last_segment() {
        assert_eq!(filename_from_url("https://example.com/img/a.jpg"), "a.jpg");
        assert_eq!(
            filename_from_url("https://example.com/a.png?w=100#frag"),
            "a.png"
        );
    }

    #[test]
    fn test_filename_falls_back_for_bare_hosts() {
        assert_eq!(filename_from_url("https://example.com/"), "image");
        assert_eq!(filename_from_url("https://example.com"), "image");
    }
}
