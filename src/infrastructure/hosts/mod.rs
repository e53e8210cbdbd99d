//! Image host adapters and their factory.

mod cloudinary;
mod dto;
mod freeimage;
mod imgbb;

use std::sync::Arc;

pub use cloudinary::CloudinaryClient;
pub use freeimage::FreeimageClient;
pub use imgbb::ImgbbClient;

use crate::domain::entities::{IurSettings, UploadMethod};
use crate::domain::errors::{ProcessError, UploadError};
use crate::domain::ports::ImageHostPort;

const USER_AGENT: &str = concat!("iur/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client every adapter uses.
///
/// # Errors
/// Returns error if HTTP client creation fails.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, UploadError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| UploadError::transport(format!("failed to create HTTP client: {e}")))
}

/// Maps a transport failure, distinguishing timeouts and connect errors.
pub(crate) fn transport_error(e: &reqwest::Error) -> UploadError {
    if e.is_timeout() {
        UploadError::transport("request timed out")
    } else if e.is_connect() {
        UploadError::transport("failed to connect to provider")
    } else {
        UploadError::transport(e.to_string())
    }
}

/// Selects and builds the provider adapter for the configured upload method.
///
/// # Errors
/// Returns [`ProcessError::Config`] when the selected provider's credentials
/// are unusable or the client cannot be built.
pub fn build_image_host(settings: &IurSettings) -> Result<Arc<dyn ImageHostPort>, ProcessError> {
    settings
        .validate_credentials()
        .map_err(ProcessError::config)?;

    let timeout = settings.upload_timeout_secs;
    let host: Arc<dyn ImageHostPort> = match settings.upload_method {
        UploadMethod::Freeimage => Arc::new(
            FreeimageClient::new(settings.freeimage.clone(), timeout)
                .map_err(|e| ProcessError::config(e.to_string()))?,
        ),
        UploadMethod::Imgbb => Arc::new(
            ImgbbClient::new(settings.imgbb.clone(), timeout)
                .map_err(|e| ProcessError::config(e.to_string()))?,
        ),
        UploadMethod::Cloudinary => Arc::new(
            CloudinaryClient::new(settings.cloudinary.clone(), timeout)
                .map_err(|e| ProcessError::config(e.to_string()))?,
        ),
    };
    Ok(host)
}
