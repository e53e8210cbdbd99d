//! Pipeline settings.
//!
//! The settings record is read-mostly: loaded once, then passed by reference
//! into the extractor and processor. Serde defaults guarantee the
//! complete-record invariant: a settings file missing any key still
//! deserializes into a fully defined record.

use serde::{Deserialize, Serialize};

/// Which provider uploads go to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UploadMethod {
    /// Freeimage.host.
    #[default]
    Freeimage,
    /// imgbb.com.
    Imgbb,
    /// Cloudinary.
    Cloudinary,
}

impl UploadMethod {
    /// Provider name as persisted in status records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Freeimage => "freeimage",
            Self::Imgbb => "imgbb",
            Self::Cloudinary => "cloudinary",
        }
    }
}

impl std::fmt::Display for UploadMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upload quality hint. Providers without a quality knob accept and ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Aggressive compression.
    Low,
    /// Balanced.
    Medium,
    /// Best quality.
    #[default]
    High,
}

/// Whether posts are re-processed automatically on save. The save-hook
/// surface itself belongs to the host platform; the field is kept so the
/// settings record stays complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoReplace {
    /// Re-process on save.
    Yes,
    /// Manual triggering only.
    #[default]
    No,
}

/// Freeimage.host credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeimageConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
}

/// imgbb credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImgbbConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
}

/// Cloudinary credentials and upload options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// API secret, used to sign upload requests.
    #[serde(default)]
    pub api_secret: String,
    /// Cloud name, part of the upload endpoint.
    #[serde(default)]
    pub cloud_name: String,
    /// Destination folder.
    #[serde(default = "default_cloudinary_folder")]
    pub folder: String,
    /// Prefer `secure_url` (https) in responses.
    #[serde(default = "default_true")]
    pub secure: bool,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            cloud_name: String::new(),
            folder: default_cloudinary_folder(),
            secure: true,
        }
    }
}

/// The full settings record.
///
/// Scalar keys come first so the record serializes into a readable TOML
/// document with the provider tables at the end.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IurSettings {
    /// Selected provider.
    #[serde(default)]
    pub upload_method: UploadMethod,

    /// Upload quality hint.
    #[serde(default)]
    pub quality: Quality,

    /// Content types eligible for processing.
    #[serde(default = "default_target_content")]
    pub target_content: Vec<String>,

    /// Delete the original asset after a successful replacement.
    #[serde(default)]
    pub delete_after_replace: bool,

    /// Re-process automatically on save.
    #[serde(default)]
    pub auto_replace: AutoReplace,

    /// Scan the featured image.
    #[serde(default = "default_true")]
    pub process_featured_image: bool,

    /// Scan `<img>` tags in the content blob.
    #[serde(default = "default_true")]
    pub process_content_images: bool,

    /// Scan gallery shortcode attachment lists.
    #[serde(default = "default_true")]
    pub process_galleries: bool,

    /// Scan the custom-field allowlist.
    #[serde(default)]
    pub process_custom_fields: bool,

    /// Custom field keys scanned when `process_custom_fields` is on.
    #[serde(default)]
    pub custom_field_keys: Vec<String>,

    /// Posts processed per bulk group.
    #[serde(default = "default_group_limit")]
    pub group_limit: u32,

    /// Seconds slept between bulk groups.
    #[serde(default = "default_group_timeout")]
    pub group_timeout: u64,

    /// Timeout for fetching source image bytes, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Timeout for provider upload calls, in seconds.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,

    /// Freeimage.host credentials.
    #[serde(default)]
    pub freeimage: FreeimageConfig,

    /// imgbb credentials.
    #[serde(default)]
    pub imgbb: ImgbbConfig,

    /// Cloudinary credentials.
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

impl Default for IurSettings {
    fn default() -> Self {
        Self {
            upload_method: UploadMethod::default(),
            freeimage: FreeimageConfig::default(),
            imgbb: ImgbbConfig::default(),
            cloudinary: CloudinaryConfig::default(),
            quality: Quality::default(),
            target_content: default_target_content(),
            delete_after_replace: false,
            auto_replace: AutoReplace::default(),
            process_featured_image: true,
            process_content_images: true,
            process_galleries: true,
            process_custom_fields: false,
            custom_field_keys: Vec::new(),
            group_limit: default_group_limit(),
            group_timeout: default_group_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
            upload_timeout_secs: default_upload_timeout(),
        }
    }
}

impl IurSettings {
    /// Verifies the selected provider has usable credentials.
    ///
    /// # Errors
    /// Returns a human-readable description of what is missing.
    pub fn validate_credentials(&self) -> Result<(), String> {
        match self.upload_method {
            UploadMethod::Freeimage if self.freeimage.api_key.trim().is_empty() => {
                Err("Freeimage API key is not configured".to_owned())
            }
            UploadMethod::Imgbb if self.imgbb.api_key.trim().is_empty() => {
                Err("imgbb API key is not configured".to_owned())
            }
            UploadMethod::Cloudinary => {
                let c = &self.cloudinary;
                if c.api_key.trim().is_empty()
                    || c.api_secret.trim().is_empty()
                    || c.cloud_name.trim().is_empty()
                {
                    Err("Cloudinary requires api_key, api_secret and cloud_name".to_owned())
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// `group_limit` clamped to at least one, so a bad settings file can
    /// never stall the bulk driver.
    #[must_use]
    pub fn effective_group_limit(&self) -> usize {
        self.group_limit.max(1) as usize
    }
}

fn default_true() -> bool {
    true
}

fn default_cloudinary_folder() -> String {
    "iur_uploads".to_owned()
}

fn default_target_content() -> Vec<String> {
    vec!["post".to_owned(), "product".to_owned()]
}

fn default_group_limit() -> u32 {
    10
}

fn default_group_timeout() -> u64 {
    5
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_upload_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_activation_record() {
        let settings = IurSettings::default();

        assert_eq!(settings.upload_method, UploadMethod::Freeimage);
        assert_eq!(settings.quality, Quality::High);
        assert_eq!(settings.target_content, vec!["post", "product"]);
        assert!(!settings.delete_after_replace);
        assert_eq!(settings.auto_replace, AutoReplace::No);
        assert!(settings.process_featured_image);
        assert!(settings.process_content_images);
        assert!(settings.process_galleries);
        assert!(!settings.process_custom_fields);
        assert_eq!(settings.group_limit, 10);
        assert_eq!(settings.group_timeout, 5);
        assert_eq!(settings.cloudinary.folder, "iur_uploads");
        assert!(settings.cloudinary.secure);
    }

    #[test]
    fn test_partial_file_still_yields_complete_record() {
        let settings: IurSettings = toml::from_str(
            r#"
            upload_method = "imgbb"

            [imgbb]
            api_key = "k"
            "#,
        )
        .unwrap();

        assert_eq!(settings.upload_method, UploadMethod::Imgbb);
        assert_eq!(settings.imgbb.api_key, "k");
        // Untouched keys fall back to the documented defaults.
        assert_eq!(settings.group_limit, 10);
        assert!(settings.process_content_images);
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let settings = IurSettings::default();
        assert!(settings.validate_credentials().is_err());

        let mut settings = IurSettings::default();
        settings.freeimage.api_key = "key".to_owned();
        assert!(settings.validate_credentials().is_ok());

        let mut settings = IurSettings {
            upload_method: UploadMethod::Cloudinary,
            ..IurSettings::default()
        };
        settings.cloudinary.api_key = "k".to_owned();
        settings.cloudinary.api_secret = "s".to_owned();
        assert!(settings.validate_credentials().is_err());
        settings.cloudinary.cloud_name = "demo".to_owned();
        assert!(settings.validate_credentials().is_ok());
    }

    #[test]
    fn test_group_limit_never_zero() {
        let settings = IurSettings {
            group_limit: 0,
            ..IurSettings::default()
        };
        assert_eq!(settings.effective_group_limit(), 1);
    }
}
