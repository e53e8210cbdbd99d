//! Cloudinary upload adapter.
//!
//! Uses signed uploads with the SHA-256 signature mode, so the account must
//! have `sha256` selected as its signature algorithm.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::multipart;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::dto::CloudinaryResponse;
use super::{build_client, transport_error};
use crate::domain::entities::{CloudinaryConfig, Quality};
use crate::domain::errors::UploadError;
use crate::domain::ports::ImageHostPort;

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Uploads through the Cloudinary upload API.
pub struct CloudinaryClient {
    client: reqwest::Client,
    base_url: String,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: CloudinaryConfig, timeout_secs: u64) -> Result<Self, UploadError> {
        Self::with_base_url(config, timeout_secs, CLOUDINARY_API_BASE)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        config: CloudinaryConfig,
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

/// Incoming transformation for the requested quality.
fn transformation_for(quality: Quality) -> &'static str {
    match quality {
        Quality::Low => "q_60",
        Quality::Medium => "q_80",
        Quality::High => "q_auto:best",
    }
}

/// Signs the request parameters: SHA-256 over the alphabetically sorted
/// `key=value` pairs joined with `&`, followed by the API secret.
fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageHostPort for CloudinaryClient {
    fn service_name(&self) -> &'static str {
        "cloudinary"
    }

    async fn upload(
        &self,
        bytes: Bytes,
        filename: &str,
        quality: Quality,
    ) -> Result<String, UploadError> {
        let url = format!(
            "{}/v1_1/{}/image/upload",
            self.base_url, self.config.cloud_name
        );

        let timestamp = Utc::now().timestamp().to_string();
        let transformation = transformation_for(quality);
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
                ("transformation", transformation),
            ],
            &self.config.api_secret,
        );

        let part = multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_owned());
        let form = multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("transformation", transformation)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        debug!(%filename, size = bytes.len(), folder = %self.config.folder, "Uploading to Cloudinary");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Cloudinary request failed");
                transport_error(&e)
            })?;

        let status = response.status();
        let body: CloudinaryResponse = response
            .json()
            .await
            .map_err(|e| UploadError::invalid_response(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(UploadError::provider(error.message));
        }

        let hosted = if self.config.secure {
            body.secure_url.or(body.url)
        } else {
            body.url.or(body.secure_url)
        };
        hosted.ok_or_else(|| {
            UploadError::invalid_response(format!("no hosted URL in response (HTTP {status})"))
        })
    }
}
