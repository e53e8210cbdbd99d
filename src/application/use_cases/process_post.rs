//! Single-post processing orchestrator.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::application::dto::ProcessReport;
use crate::application::services::UrlExtractor;
use crate::domain::entities::{
    ImageLocation, IurSettings, META_LAST_PROCESSED, META_UPLOAD_STATUS, Post, PostId,
    UploadOutcome, UploadStatus,
};
use crate::domain::errors::ProcessError;
use crate::domain::ports::{ContentStorePort, FailureLogPort, ImageFetchPort, ImageHostPort};

/// One distinct URL queued for upload, with every location it appears in.
struct PendingImage {
    url: String,
    locations: Vec<ImageLocation>,
}

/// Working copy of the post's rewritable fields. All rewrites land here
/// first; the store is only written once the whole outcome set is known.
struct RewriteBuffer {
    content: String,
    content_changed: bool,
    featured: Option<String>,
    featured_changed: bool,
    fields: HashMap<String, String>,
    changed_fields: Vec<String>,
}

impl RewriteBuffer {
    fn new(post: &Post) -> Self {
        Self {
            content: post.content.clone(),
            content_changed: false,
            featured: post.featured_image.clone(),
            featured_changed: false,
            fields: post.custom_fields.clone(),
            changed_fields: Vec::new(),
        }
    }

    /// Rewrites every occurrence of `original` in the fields named by
    /// `locations`.
    fn apply(&mut self, locations: &[ImageLocation], original: &str, hosted: &str) {
        for location in locations {
            match location {
                ImageLocation::Content | ImageLocation::Gallery => {
                    if self.content.contains(original) {
                        self.content = self.content.replace(original, hosted);
                        self.content_changed = true;
                    }
                }
                ImageLocation::Featured => {
                    if self.featured.as_deref() == Some(original) {
                        self.featured = Some(hosted.to_owned());
                        self.featured_changed = true;
                    }
                }
                ImageLocation::CustomField(key) => {
                    if let Some(value) = self.fields.get_mut(key)
                        && value.contains(original)
                    {
                        *value = value.replace(original, hosted);
                        if !self.changed_fields.contains(key) {
                            self.changed_fields.push(key.clone());
                        }
                    }
                }
            }
        }
    }
}

/// Processes one post: extract, dedup, upload, rewrite, record.
///
/// Per-image failures are isolated: one bad image never aborts the rest.
/// Only missing credentials, an ineligible post id, or a store failure abort
/// the call.
pub struct ProcessPostUseCase {
    store: Arc<dyn ContentStorePort>,
    host: Arc<dyn ImageHostPort>,
    fetcher: Arc<dyn ImageFetchPort>,
    failure_log: Arc<dyn FailureLogPort>,
    extractor: UrlExtractor,
}

impl ProcessPostUseCase {
    /// Creates the use case over the injected capabilities.
    #[must_use]
    pub fn new(
        store: Arc<dyn ContentStorePort>,
        host: Arc<dyn ImageHostPort>,
        fetcher: Arc<dyn ImageFetchPort>,
        failure_log: Arc<dyn FailureLogPort>,
    ) -> Self {
        let extractor = UrlExtractor::new(store.clone());
        Self {
            store,
            host,
            fetcher,
            failure_log,
            extractor,
        }
    }

    /// Runs the replacement pipeline for `post_id`.
    ///
    /// # Errors
    /// Returns [`ProcessError`] when credentials are unusable, the post id
    /// is unknown or ineligible, or the content store rejects a write.
    pub async fn execute(
        &self,
        post_id: PostId,
        settings: &IurSettings,
    ) -> Result<ProcessReport, ProcessError> {
        settings.validate_credentials().map_err(|message| {
            self.failure_log.append("config", &message);
            ProcessError::config(message)
        })?;

        let post = self
            .store
            .get_post(post_id)
            .await
            .map_err(|e| self.store_failure("get_post", &e.to_string()))?
            .ok_or_else(|| self.not_found(post_id))?;

        if !post.is_eligible(&settings.target_content) {
            debug!(%post_id, post_type = %post.post_type, "Post type not in target content");
            return Err(self.not_found(post_id));
        }

        let references = self.extractor.extract(&post, settings).await;
        let pending = dedup_references(references);
        debug!(%post_id, unique_urls = pending.len(), "Extraction finished");

        let mut report = ProcessReport::default();
        let mut buffer = RewriteBuffer::new(&post);
        let mut outcomes: Vec<UploadOutcome> = Vec::with_capacity(pending.len());
        let mut replaced_originals: Vec<String> = Vec::new();

        for image in &pending {
            match self.upload_one(image, settings).await {
                Ok(hosted) => {
                    buffer.apply(&image.locations, &image.url, &hosted);
                    outcomes.push(UploadOutcome::succeeded(&image.url, &hosted));
                    replaced_originals.push(image.url.clone());
                }
                Err(message) => {
                    report.error(format!("{}: {message}", image.url));
                    outcomes.push(UploadOutcome::failed(&image.url, message));
                }
            }
        }

        self.persist_rewrites(post_id, &buffer).await?;

        if settings.delete_after_replace {
            self.delete_originals(&replaced_originals, &mut report).await;
        }

        let status = UploadStatus::from_outcomes(self.host.service_name(), outcomes);
        self.persist_status(post_id, &status).await?;

        report.replaced = replaced_originals.len();
        info!(
            %post_id,
            replaced = report.replaced,
            status = %status.status,
            "Processing finished"
        );
        Ok(report)
    }

    /// Fetches and uploads one image. The error string is what lands in the
    /// outcome record.
    async fn upload_one(
        &self,
        image: &PendingImage,
        settings: &IurSettings,
    ) -> Result<String, String> {
        let fetched = self.fetcher.fetch(&image.url).await.map_err(|e| {
            warn!(url = %image.url, error = %e, "Source fetch failed");
            self.failure_log.append("fetch", &e.to_string());
            e.to_string()
        })?;

        self.host
            .upload(fetched.bytes, &fetched.filename, settings.quality)
            .await
            .map_err(|e| {
                warn!(url = %image.url, error = %e, "Upload failed");
                self.failure_log.append("upload", &e.to_string());
                e.to_string()
            })
    }

    /// Writes the rewritten fields back, one write per changed field.
    async fn persist_rewrites(
        &self,
        post_id: PostId,
        buffer: &RewriteBuffer,
    ) -> Result<(), ProcessError> {
        if buffer.content_changed {
            self.store
                .update_content(post_id, &buffer.content)
                .await
                .map_err(|e| self.store_failure("update_content", &e.to_string()))?;
        }
        if buffer.featured_changed
            && let Some(url) = buffer.featured.as_deref()
        {
            self.store
                .update_featured_image(post_id, url)
                .await
                .map_err(|e| self.store_failure("update_featured_image", &e.to_string()))?;
        }
        for key in &buffer.changed_fields {
            if let Some(value) = buffer.fields.get(key) {
                self.store
                    .update_custom_field(post_id, key, value)
                    .await
                    .map_err(|e| self.store_failure("update_custom_field", &e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Best-effort deletion of replaced originals. Failures become warnings,
    /// never errors: the replacement already succeeded.
    async fn delete_originals(&self, originals: &[String], report: &mut ProcessReport) {
        for url in originals {
            match self.store.delete_attachment(url).await {
                Ok(true) => debug!(%url, "Original asset deleted"),
                Ok(false) => {
                    report.warn(format!("no original asset found to delete for {url}"));
                }
                Err(e) => {
                    warn!(%url, error = %e, "Deletion of original asset failed");
                    self.failure_log.append("delete", &e.to_string());
                    report.warn(format!("failed to delete original asset for {url}: {e}"));
                }
            }
        }
    }

    /// Persists the status record, then the last-processed stamp. The stamp
    /// is attempted even when the status write failed.
    async fn persist_status(
        &self,
        post_id: PostId,
        status: &UploadStatus,
    ) -> Result<(), ProcessError> {
        let value = serde_json::to_value(status)
            .map_err(|e| self.store_failure("serialize_status", &e.to_string()))?;
        let status_write = self.store.update_meta(post_id, META_UPLOAD_STATUS, value).await;

        let stamp = serde_json::Value::String(Utc::now().to_rfc3339());
        let stamp_write = self
            .store
            .update_meta(post_id, META_LAST_PROCESSED, stamp)
            .await;

        status_write.map_err(|e| self.store_failure("write_status", &e.to_string()))?;
        stamp_write.map_err(|e| self.store_failure("write_last_processed", &e.to_string()))?;
        Ok(())
    }

    fn store_failure(&self, context: &str, message: &str) -> ProcessError {
        self.failure_log.append(context, message);
        ProcessError::store(format!("{context}: {message}"))
    }

    fn not_found(&self, post_id: PostId) -> ProcessError {
        let e = ProcessError::not_found(post_id);
        self.failure_log.append("process", &e.to_string());
        e
    }
}

/// Collapses references to one entry per distinct URL, keeping the first-seen
/// order and the full location set for the rewrite step.
fn dedup_references(
    references: Vec<crate::domain::entities::ImageReference>,
) -> Vec<PendingImage> {
    let mut pending: Vec<PendingImage> = Vec::new();
    for reference in references {
        if let Some(existing) = pending.iter_mut().find(|p| p.url == reference.original_url) {
            if !existing.locations.contains(&reference.location) {
                existing.locations.push(reference.location);
            }
        } else {
            pending.push(PendingImage {
                url: reference.original_url,
                locations: vec![reference.location],
            });
        }
    }
    pending
}
