//! imgbb upload adapter.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use reqwest::multipart;
use tracing::{debug, warn};

use super::dto::ImgbbResponse;
use super::{build_client, transport_error};
use crate::domain::entities::{ImgbbConfig, Quality};
use crate::domain::errors::UploadError;
use crate::domain::ports::ImageHostPort;

const IMGBB_API_BASE: &str = "https://api.imgbb.com";

/// Uploads through the imgbb v1 API.
pub struct ImgbbClient {
    client: reqwest::Client,
    base_url: String,
    config: ImgbbConfig,
}

impl ImgbbClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: ImgbbConfig, timeout_secs: u64) -> Result<Self, UploadError> {
        Self::with_base_url(config, timeout_secs, IMGBB_API_BASE)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        config: ImgbbConfig,
        timeout_secs: u64,
        base_url: impl Into<String>,
    ) -> Result<Self, UploadError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.into(),
            config,
        })
    }
}

#[async_trait]
impl ImageHostPort for ImgbbClient {
    fn service_name(&self) -> &'static str {
        "imgbb"
    }

    async fn upload(
        &self,
        bytes: Bytes,
        filename: &str,
        _quality: Quality,
    ) -> Result<String, UploadError> {
        let url = format!("{}/1/upload", self.base_url);

        let form = multipart::Form::new()
            .text("image", BASE64.encode(&bytes))
            .text("name", filename.to_owned());

        debug!(%filename, size = bytes.len(), "Uploading to imgbb");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "imgbb request failed");
                transport_error(&e)
            })?;

        let status = response.status();
        let body: ImgbbResponse = response
            .json()
            .await
            .map_err(|e| UploadError::invalid_response(e.to_string()))?;

        if body.success.unwrap_or(false)
            && let Some(data) = body.data
        {
            return Ok(data.url);
        }

        let message = body
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(UploadError::provider(message))
    }
}
