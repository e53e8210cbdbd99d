//! JSON-catalog content store.
//!
//! Adapts a catalog file on disk to [`ContentStorePort`] so the CLI can
//! exercise the pipeline against exported content. The whole catalog is
//! loaded once and flushed back after every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{Post, PostId};
use crate::domain::ports::{ContentStorePort, StoreError, StoreResult};

/// One catalog entry: the post plus its meta bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogPost {
    #[serde(flatten)]
    post: Post,
    #[serde(default)]
    meta: HashMap<String, serde_json::Value>,
}

/// On-disk catalog shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Catalog {
    #[serde(default)]
    posts: Vec<CatalogPost>,
    /// Media subsystem: attachment id (as string key) to URL.
    #[serde(default)]
    attachments: HashMap<String, String>,
}

/// File-backed implementation of [`ContentStorePort`].
pub struct JsonContentStore {
    path: PathBuf,
    catalog: RwLock<Catalog>,
}

impl JsonContentStore {
    /// Opens a catalog file, creating an empty catalog when the file does
    /// not exist yet.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the file exists but cannot be read or
    /// parsed.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let catalog = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
            serde_json::from_str(&content).map_err(|e| StoreError::Serialization(e.to_string()))?
        } else {
            debug!(path = %path.display(), "Catalog file not found, starting empty");
            Catalog::default()
        };

        Ok(Self {
            path,
            catalog: RwLock::new(catalog),
        })
    }

    /// Flushes the catalog back to disk.
    async fn persist(&self, catalog: &Catalog) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(catalog)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        fs::write(&self.path, content)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    /// Runs a mutation on the post, persisting on success.
    async fn mutate_post<F>(&self, id: PostId, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Post),
    {
        let mut catalog = self.catalog.write().await;
        let entry = catalog
            .posts
            .iter_mut()
            .find(|p| p.post.id == id)
            .ok_or_else(|| StoreError::Io(format!("unknown post {id}")))?;
        f(&mut entry.post);
        let snapshot = catalog.clone();
        drop(catalog);
        self.persist(&snapshot).await
    }
}

#[async_trait]
impl ContentStorePort for JsonContentStore {
    async fn get_post(&self, id: PostId) -> StoreResult<Option<Post>> {
        Ok(self
            .catalog
            .read()
            .await
            .posts
            .iter()
            .find(|p| p.post.id == id)
            .map(|p| p.post.clone()))
    }

    async fn update_content(&self, id: PostId, content: &str) -> StoreResult<()> {
        self.mutate_post(id, |post| post.content = content.to_owned())
            .await
    }

    async fn update_featured_image(&self, id: PostId, url: &str) -> StoreResult<()> {
        self.mutate_post(id, |post| post.featured_image = Some(url.to_owned()))
            .await
    }

    async fn update_custom_field(&self, id: PostId, key: &str, value: &str) -> StoreResult<()> {
        let key = key.to_owned();
        let value = value.to_owned();
        self.mutate_post(id, move |post| {
            post.custom_fields.insert(key, value);
        })
        .await
    }

    async fn get_meta(&self, id: PostId, key: &str) -> StoreResult<Option<serde_json::Value>> {
        Ok(self
            .catalog
            .read()
            .await
            .posts
            .iter()
            .find(|p| p.post.id == id)
            .and_then(|p| p.meta.get(key).cloned()))
    }

    async fn update_meta(
        &self,
        id: PostId,
        key: &str,
        value: serde_json::Value,
    ) -> StoreResult<()> {
        let mut catalog = self.catalog.write().await;
        let entry = catalog
            .posts
            .iter_mut()
            .find(|p| p.post.id == id)
            .ok_or_else(|| StoreError::Io(format!("unknown post {id}")))?;
        entry.meta.insert(key.to_owned(), value);
        let snapshot = catalog.clone();
        drop(catalog);
        self.persist(&snapshot).await
    }

    async fn attachment_url(&self, attachment_id: u64) -> Option<String> {
        self.catalog
            .read()
            .await
            .attachments
            .get(&attachment_id.to_string())
            .cloned()
    }

    async fn delete_attachment(&self, url: &str) -> StoreResult<bool> {
        let mut catalog = self.catalog.write().await;
        let id = catalog
            .attachments
            .iter()
            .find_map(|(id, stored)| (stored == url).then(|| id.clone()));
        let Some(id) = id else {
            return Ok(false);
        };
        catalog.attachments.remove(&id);
        let snapshot = catalog.clone();
        drop(catalog);
        self.persist(&snapshot).await?;
        Ok(true)
    }

    async fn list_posts(&self, post_types: &[String]) -> StoreResult<Vec<PostId>> {
        Ok(self
            .catalog
            .read()
            .await
            .posts
            .iter()
            .filter(|p| post_types.iter().any(|t| t == &p.post.post_type))
            .map(|p| p.post.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn sample_post(id: u64) -> Post {
        Post {
            id: PostId::new(id),
            post_type: "post".to_owned(),
            title: "t".to_owned(),
            content: r#"<img src="https://example.com/a.jpg">"#.to_owned(),
            featured_image: None,
            custom_fields: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_catalog_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonContentStore::open(dir.path().join("catalog.json"))
            .await
            .unwrap();
        assert!(store.get_post(PostId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = Catalog {
            posts: vec![CatalogPost {
                post: sample_post(1),
                meta: HashMap::new(),
            }],
            attachments: HashMap::from([("5".to_owned(), "https://example.com/a.jpg".to_owned())]),
        };
        std::fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();

        let store = JsonContentStore::open(&path).await.unwrap();
        store
            .update_content(PostId::new(1), "<p>rewritten</p>")
            .await
            .unwrap();
        store
            .update_meta(PostId::new(1), "_iur_last_processed", "now".into())
            .await
            .unwrap();
        assert!(store.delete_attachment("https://example.com/a.jpg").await.unwrap());

        let reopened = JsonContentStore::open(&path).await.unwrap();
        let post = reopened.get_post(PostId::new(1)).await.unwrap().unwrap();
        assert_eq!(post.content, "<p>rewritten</p>");
        assert_eq!(
            reopened
                .get_meta(PostId::new(1), "_iur_last_processed")
                .await
                .unwrap(),
            Some("now".into())
        );
        assert!(reopened.attachment_url(5).await.is_none());
        assert!(!reopened.delete_attachment("https://example.com/a.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_posts_filters_by_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut product = sample_post(2);
        product.post_type = "product".to_owned();
        let mut page = sample_post(3);
        page.post_type = "page".to_owned();

        let catalog = Catalog {
            posts: vec![
                CatalogPost {
                    post: sample_post(1),
                    meta: HashMap::new(),
                },
                CatalogPost {
                    post: product,
                    meta: HashMap::new(),
                },
                CatalogPost {
                    post: page,
                    meta: HashMap::new(),
                },
            ],
            attachments: HashMap::new(),
        };
        std::fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();

        let store = JsonContentStore::open(&path).await.unwrap();
        let ids = store
            .list_posts(&["post".to_owned(), "product".to_owned()])
            .await
            .unwrap();
        assert_eq!(ids, vec![PostId::new(1), PostId::new(2)]);
    }
}
