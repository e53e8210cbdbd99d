//! Port definition for the host platform's content store.

use async_trait::async_trait;

use crate::domain::entities::{Post, PostId};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by a content store adapter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// I/O failure in the backing storage.
    #[error("store io error: {0}")]
    Io(String),
    /// Stored data could not be read back into the expected shape.
    #[error("store serialization error: {0}")]
    Serialization(String),
}

/// Port over the host platform's content storage and media subsystem.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ContentStorePort: Send + Sync {
    /// Loads a post with its scanned fields. Returns `None` for unknown ids.
    async fn get_post(&self, id: PostId) -> StoreResult<Option<Post>>;

    /// Replaces the post's content blob.
    async fn update_content(&self, id: PostId, content: &str) -> StoreResult<()>;

    /// Replaces the post's featured image URL.
    async fn update_featured_image(&self, id: PostId, url: &str) -> StoreResult<()>;

    /// Replaces one custom field value.
    async fn update_custom_field(&self, id: PostId, key: &str, value: &str) -> StoreResult<()>;

    /// Reads a structured meta value.
    async fn get_meta(&self, id: PostId, key: &str) -> StoreResult<Option<serde_json::Value>>;

    /// Writes a structured meta value, overwriting any previous one.
    async fn update_meta(&self, id: PostId, key: &str, value: serde_json::Value)
    -> StoreResult<()>;

    /// Resolves a gallery attachment id to its URL, if the media subsystem
    /// knows it.
    async fn attachment_url(&self, attachment_id: u64) -> Option<String>;

    /// Deletes the original asset behind a URL. Returns false when the media
    /// subsystem had nothing to delete.
    async fn delete_attachment(&self, url: &str) -> StoreResult<bool>;

    /// Lists ids of all posts whose type is in `post_types`, in store order.
    async fn list_posts(&self, post_types: &[String]) -> StoreResult<Vec<PostId>>;
}
