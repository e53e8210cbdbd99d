//! In-memory content store.
//!
//! Backs the test suite and doubles as a scratch catalog for dry runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{Post, PostId};
use crate::domain::ports::{ContentStorePort, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    posts: HashMap<PostId, Post>,
    meta: HashMap<(PostId, String), serde_json::Value>,
    attachments: HashMap<u64, String>,
    deleted: Vec<String>,
    order: Vec<PostId>,
}

/// Thread-safe in-memory implementation of [`ContentStorePort`].
#[derive(Default)]
pub struct MemoryContentStore {
    inner: RwLock<Inner>,
    fail_deletions: AtomicBool,
}

impl MemoryContentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a post.
    pub async fn insert_post(&self, post: Post) {
        let mut inner = self.inner.write().await;
        if !inner.order.contains(&post.id) {
            inner.order.push(post.id);
        }
        inner.posts.insert(post.id, post);
    }

    /// Registers an attachment in the media subsystem.
    pub async fn insert_attachment(&self, id: u64, url: &str) {
        self.inner
            .write()
            .await
            .attachments
            .insert(id, url.to_owned());
    }

    /// Makes every deletion request fail, for exercising the best-effort
    /// cleanup path.
    pub fn set_fail_deletions(&self, fail: bool) {
        self.fail_deletions.store(fail, Ordering::SeqCst);
    }

    /// Reads a post back.
    pub async fn post(&self, id: PostId) -> Option<Post> {
        self.inner.read().await.posts.get(&id).cloned()
    }

    /// Reads a meta value back.
    pub async fn meta(&self, id: PostId, key: &str) -> Option<serde_json::Value> {
        self.inner
            .read()
            .await
            .meta
            .get(&(id, key.to_owned()))
            .cloned()
    }

    /// URLs whose originals were deleted, in deletion order.
    pub async fn deleted(&self) -> Vec<String> {
        self.inner.read().await.deleted.clone()
    }
}

#[async_trait]
impl ContentStorePort for MemoryContentStore {
    async fn get_post(&self, id: PostId) -> StoreResult<Option<Post>> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn update_content(&self, id: PostId, content: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match inner.posts.get_mut(&id) {
            Some(post) => {
                post.content = content.to_owned();
                Ok(())
            }
            None => Err(StoreError::Io(format!("unknown post {id}"))),
        }
    }

    async fn update_featured_image(&self, id: PostId, url: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match inner.posts.get_mut(&id) {
            Some(post) => {
                post.featured_image = Some(url.to_owned());
                Ok(())
            }
            None => Err(StoreError::Io(format!("unknown post {id}"))),
        }
    }

    async fn update_custom_field(&self, id: PostId, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match inner.posts.get_mut(&id) {
            Some(post) => {
                post.custom_fields.insert(key.to_owned(), value.to_owned());
                Ok(())
            }
            None => Err(StoreError::Io(format!("unknown post {id}"))),
        }
    }

    async fn get_meta(&self, id: PostId, key: &str) -> StoreResult<Option<serde_json::Value>> {
        Ok(self
            .inner
            .read()
            .await
            .meta
            .get(&(id, key.to_owned()))
            .cloned())
    }

    async fn update_meta(
        &self,
        id: PostId,
        key: &str,
        value: serde_json::Value,
    ) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .meta
            .insert((id, key.to_owned()), value);
        Ok(())
    }

    async fn attachment_url(&self, attachment_id: u64) -> Option<String> {
        self.inner.read().await.attachments.get(&attachment_id).cloned()
    }

    async fn delete_attachment(&self, url: &str) -> StoreResult<bool> {
        if self.fail_deletions.load(Ordering::SeqCst) {
            return Err(StoreError::Io("media subsystem rejected deletion".to_owned()));
        }
        let mut inner = self.inner.write().await;
        let id = inner
            .attachments
            .iter()
            .find_map(|(id, stored)| (stored == url).then_some(*id));
        match id {
            Some(id) => {
                inner.attachments.remove(&id);
                inner.deleted.push(url.to_owned());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_posts(&self, post_types: &[String]) -> StoreResult<Vec<PostId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter(|id| {
                inner
                    .posts
                    .get(id)
                    .is_some_and(|p| post_types.iter().any(|t| t == &p.post_type))
            })
            .copied()
            .collect())
    }
}
