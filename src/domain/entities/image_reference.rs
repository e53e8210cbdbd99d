//! Image references discovered inside a post.

/// Structural location a URL was found in. Retained for the rewrite step,
/// never used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageLocation {
    /// An `<img>` tag inside the content blob.
    Content,
    /// The post's featured image.
    Featured,
    /// An attachment referenced by a gallery shortcode.
    Gallery,
    /// A custom field value. Carries the field key so the rewrite can target
    /// the right field.
    CustomField(String),
}

impl std::fmt::Display for ImageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Featured => write!(f, "featured"),
            Self::Gallery => write!(f, "gallery"),
            Self::CustomField(key) => write!(f, "custom_field:{key}"),
        }
    }
}

/// A single image URL discovered by the extractor, tagged with where it was
/// found. Transient: created and discarded within one processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// The URL exactly as it appears in the post.
    pub original_url: String,
    /// Where the URL was found.
    pub location: ImageLocation,
}

impl ImageReference {
    /// Creates a reference for the given URL and location.
    #[must_use]
    pub fn new(original_url: impl Into<String>, location: ImageLocation) -> Self {
        Self {
            original_url: original_url.into(),
            location,
        }
    }
}
