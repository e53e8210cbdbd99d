//! Post entity as read from the content store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier of a post or product in the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl PostId {
    /// Creates a new `PostId`.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the inner numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A content item (post, product, ...) with the fields the pipeline scans.
///
/// Gallery shortcodes live inside `content`; their attachment ids resolve to
/// URLs through the store's media subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Store identifier.
    pub id: PostId,
    /// Content type (`post`, `product`, ...). Eligibility is checked against
    /// the configured target content types.
    pub post_type: String,
    /// Human-readable title, used for logs only.
    #[serde(default)]
    pub title: String,
    /// The HTML content blob.
    pub content: String,
    /// Featured image URL, if one is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// Custom field values keyed by field name.
    #[serde(default)]
    pub custom_fields: HashMap<String, String>,
}

impl Post {
    /// Returns true when the post's type is one of the given content types.
    #[must_use]
    pub fn is_eligible(&self, target_content: &[String]) -> bool {
        target_content.iter().any(|t| t == &self.post_type)
    }
}
