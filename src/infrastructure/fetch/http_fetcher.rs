//! HTTP source-byte fetcher.

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, warn};

use crate::domain::errors::FetchError;
use crate::domain::ports::{FetchedImage, ImageFetchPort, filename_from_url};

/// Fetches source bytes over HTTP with a bounded timeout.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher whose requests time out after `timeout_secs`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                FetchError::network("-", format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        debug!(%url, "Fetching source image");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_owned(),
                }
            } else if e.is_connect() {
                FetchError::network(url, "connection failed")
            } else {
                FetchError::network(url, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Origin answered with non-success status");
            return Err(FetchError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_owned());

        // A present, non-image content type is a hard stop; an absent header
        // is tolerated since plenty of origins misconfigure it.
        if let Some(ct) = content_type.as_deref()
            && !ct.starts_with("image/")
        {
            return Err(FetchError::NotAnImage {
                url: url.to_owned(),
                content_type: ct.to_owned(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, e.to_string()))?;

        Ok(FetchedImage {
            bytes,
            content_type,
            filename: filename_from_url(url),
        })
    }
}
