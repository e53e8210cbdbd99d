
use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::{ImageLocation, ImageReference, IurSettings, Post};
use crate::domain::ports::{ContentStorePort, is_hosted_url};

/// Scans a post's content, featured image, galleries and custom fields for
/// image URLs that still point at foreign origins.
///
/// Pure function of post + settings + the media subsystem's attachment
/// mapping: re-invoking with the same inputs yields the same sequence.
pub struct UrlExtractor {
    store: Arc<dyn ContentStorePort>,
}

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]+src\s*=\s*["']([^"']+)["']"#).unwrap());

static GALLERY_IDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[gallery[^\]]*\bids\s*=\s*["']([^"']+)["']"#).unwrap());

impl UrlExtractor {
    /// Creates an extractor resolving gallery attachments through `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStorePort>) -> Self {
        Self { store }
    }

    /// Produces the distinct image references in the post, gated by the
    /// settings toggles, in discovery order.
    pub async fn extract(&self, post: &Post, settings: &IurSettings) -> Vec<ImageReference> {
        let mut refs: Vec<ImageReference> = Vec::new();

        if settings.process_content_images {
            for url in Self::content_image_urls(&post.content) {
                push_unique(&mut refs, url, ImageLocation::Content);
            }
        }

        if settings.process_galleries {
            for id in Self::gallery_attachment_ids(&post.content) {
                if let Some(url) = self.store.attachment_url(id).await
                    && eligible(&url)
                {
                    push_unique(&mut refs, url, ImageLocation::Gallery);
                }
            }
        }

        if settings.process_featured_image
            && let Some(url) = post.featured_image.as_deref()
            && eligible(url)
        {
            push_unique(&mut refs, url.to_owned(), ImageLocation::Featured);
        }

        if settings.process_custom_fields {
            for key in &settings.custom_field_keys {
                if let Some(value) = post.custom_fields.get(key) {
                    for url in Self::field_image_urls(value) {
                        push_unique(&mut refs, url, ImageLocation::CustomField(key.clone()));
                    }
                }
            }
        }

        refs
    }

    /// Lazily iterates eligible `<img src>` URLs in a content blob.
    fn content_image_urls(content: &str) -> impl Iterator<Item = String> + '_ {
        let scan = content.contains("http");
        IMG_SRC_RE
            .captures_iter(content)
            .filter(move |_| scan)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_owned())
            .filter(|url| eligible(url))
    }

    /// Attachment ids from every gallery shortcode in the blob.
    fn gallery_attachment_ids(content: &str) -> Vec<u64> {
        let mut ids = Vec::new();
        for cap in GALLERY_IDS_RE.captures_iter(content) {
            if let Some(list) = cap.get(1) {
                for part in list.as_str().split(',') {
                    if let Ok(id) = part.trim().parse::<u64>()
                        && !ids.contains(&id)
                    {
                        ids.push(id);
                    }
                }
            }
        }
        ids
    }

    /// URLs in a custom field: a bare URL value, or `<img>` tags when the
    /// field holds markup.
    fn field_image_urls(value: &str) -> Vec<String> {
        let trimmed = value.trim();
        if eligible(trimmed) && !trimmed.contains(['<', ' ']) {
            return vec![trimmed.to_owned()];
        }
        Self::content_image_urls(value).collect()
    }
}

fn eligible(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && !is_hosted_url(url)
}

fn push_unique(refs: &mut Vec<ImageReference>, url: String, location: ImageLocation) {
    let candidate = ImageReference::new(url, location);
    if !refs.contains(&candidate) {
        refs.push(candidate);
    }
}
