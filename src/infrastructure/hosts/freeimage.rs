//! Freeimage.host upload adapter.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use reqwest::multipart;
use tracing::{debug, warn};

use super::dto::FreeimageResponse;
use super::{build_client, transport_error};
use crate::domain::entities::{FreeimageConfig, Quality};
use crate::domain::errors::UploadError;
use crate::domain::ports::ImageHostPort;

const FREEIMAGE_API_BASE: &str = "https://freeimage.host";

/// Uploads through the Freeimage.host v1 API.
pub struct FreeimageClient {
    client: reqwest::Client,
    base_url: String,
    config: FreeimageConfig,
}

impl FreeimageClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: FreeimageConfig, timeout_secs: u64) -> Result<Self, UploadError> {
        Self::with_base_url(config, timeout_secs, FREEIMAGE_API_BASE)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        config: FreeimageConfig,
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
impl ImageHostPort for FreeimageClient {
    fn service_name(&self) -> &'static str {
        "freeimage"
    }

    async fn upload(
        &self,
        bytes: Bytes,
        filename: &str,
        _quality: Quality,
    ) -> Result<String, UploadError> {
        let url = format!("{}/api/1/upload", self.base_url);

        let form = multipart::Form::new()
            .text("key", self.config.api_key.clone())
            .text("action", "upload")
            .text("source", BASE64.encode(&bytes))
            .text("format", "json");

        debug!(%filename, size = bytes.len(), "Uploading to Freeimage.host");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Freeimage request failed");
                transport_error(&e)
            })?;

        let status = response.status();
        let body: FreeimageResponse = response
            .json()
            .await
            .map_err(|e| UploadError::invalid_response(e.to_string()))?;

        if let Some(image) = body.image {
            return Ok(image.url);
        }

        let message = body
            .error
            .map(|e| e.message)
            .or(body.status_txt)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(UploadError::provider(message))
    }
}
