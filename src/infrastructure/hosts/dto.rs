//! Provider API response shapes.
//!
//! Fields are optional across the board: error payloads and success payloads
//! share endpoints, and the adapters decide what a response means.

use serde::Deserialize;

/// Error object embedded in Freeimage/imgbb responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Provider-reported reason.
    #[serde(default)]
    pub message: String,
}

/// Hosted image block in a Freeimage response.
#[derive(Debug, Clone, Deserialize)]
pub struct FreeimageImage {
    /// Direct URL of the hosted copy.
    pub url: String,
}

/// Freeimage.host upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct FreeimageResponse {
    /// Present on success.
    #[serde(default)]
    pub image: Option<FreeimageImage>,
    /// Present on failure.
    #[serde(default)]
    pub error: Option<ApiError>,
    /// Human-readable status.
    #[serde(default)]
    pub status_txt: Option<String>,
}

/// Hosted image block in an imgbb response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImgbbData {
    /// Direct URL of the hosted copy.
    pub url: String,
}

/// imgbb upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImgbbResponse {
    /// Present on success.
    #[serde(default)]
    pub data: Option<ImgbbData>,
    /// True on success.
    #[serde(default)]
    pub success: Option<bool>,
    /// Present on failure.
    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Error object embedded in a Cloudinary response.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryError {
    /// Provider-reported reason.
    #[serde(default)]
    pub message: String,
}

/// Cloudinary upload response.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryResponse {
    /// HTTPS URL of the hosted copy.
    #[serde(default)]
    pub secure_url: Option<String>,
    /// HTTP URL of the hosted copy.
    #[serde(default)]
    pub url: Option<String>,
    /// Present on failure.
    #[serde(default)]
    pub error: Option<CloudinaryError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeimage_success_parses() {
        let body = r#"{
            "status_code": 200,
            "image": {"url": "https://iili.io/abc.jpg", "display_url": "https://iili.io/abc.md.jpg"},
            "status_txt": "OK"
        }"#;
        let response: FreeimageResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.image.unwrap().url, "https://iili.io/abc.jpg");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_freeimage_error_parses() {
        let body = r#"{
            "status_code": 400,
            "error": {"message": "Invalid API v1 key.", "code": 100},
            "status_txt": "Bad Request"
        }"#;
        let response: FreeimageResponse = serde_json::from_str(body).unwrap();
        assert!(response.image.is_none());
        assert_eq!(response.error.unwrap().message, "Invalid API v1 key.");
    }

    #[test]
    fn test_imgbb_success_parses() {
        let body = r#"{
            "data": {"url": "https://i.ibb.co/xyz/a.jpg", "delete_url": "https://ibb.co/x"},
            "success": true,
            "status": 200
        }"#;
        let response: ImgbbResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.unwrap().url, "https://i.ibb.co/xyz/a.jpg");
        assert_eq!(response.success, Some(true));
    }

    #[test]
    fn test_cloudinary_error_parses() {
        let body = r#"{"error": {"message": "Invalid Signature"}}"#;
        let response: CloudinaryResponse = serde_json::from_str(body).unwrap();
        assert!(response.secure_url.is_none());
        assert_eq!(response.error.unwrap().message, "Invalid Signature");
    }
}
