//! Catalog-wide bulk driver.
//!
//! Breadth lives here, not in the processor: posts are handled in groups of
//! `group_limit` with a `group_timeout` pause between groups, a deliberate
//! backpressure mechanism against third-party host quotas.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crate::application::dto::{BulkFailure, BulkReport};
use crate::application::use_cases::ProcessPostUseCase;
use crate::domain::entities::{IurSettings, META_UPLOAD_STATUS, PostId, UploadStatus};
use crate::domain::errors::ProcessError;
use crate::domain::ports::ContentStorePort;

/// Runs the single-post processor over every eligible post in the catalog.
pub struct BulkReplaceUseCase {
    store: Arc<dyn ContentStorePort>,
    processor: Arc<ProcessPostUseCase>,
}

impl BulkReplaceUseCase {
    /// Creates the bulk driver.
    #[must_use]
    pub const fn new(store: Arc<dyn ContentStorePort>, processor: Arc<ProcessPostUseCase>) -> Self {
        Self { store, processor }
    }

    /// Processes the whole catalog. Posts whose persisted status is already
    /// `success` are skipped unless `force` is set. `cancel` is honored at
    /// group boundaries, never mid-post.
    ///
    /// # Errors
    /// Returns [`ProcessError`] when credentials are unusable or the catalog
    /// cannot be listed. Per-post failures are collected into the report.
    pub async fn execute(
        &self,
        settings: &IurSettings,
        force: bool,
        cancel: &AtomicBool,
    ) -> Result<BulkReport, ProcessError> {
        settings
            .validate_credentials()
            .map_err(ProcessError::config)?;

        let ids = self
            .store
            .list_posts(&settings.target_content)
            .await
            .map_err(|e| ProcessError::store(e.to_string()))?;

        info!(total = ids.len(), group_limit = settings.effective_group_limit(), "Bulk pass starting");

        let mut report = BulkReport::default();
        let groups: Vec<&[PostId]> = ids.chunks(settings.effective_group_limit()).collect();
        let group_count = groups.len();

        for (index, group) in groups.into_iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                info!(groups_done = index, "Bulk pass cancelled");
                report.cancelled = true;
                break;
            }

            debug!(group = index + 1, of = group_count, size = group.len(), "Processing group");
            for &post_id in group {
                if !force && self.already_migrated(post_id).await {
                    debug!(%post_id, "Skipping already-migrated post");
                    report.skipped += 1;
                    continue;
                }

                report.processed += 1;
                match self.processor.execute(post_id, settings).await {
                    Ok(outcome) => report.replaced += outcome.replaced,
                    Err(e) => {
                        warn!(%post_id, error = %e, "Post failed during bulk pass");
                        report.failures.push(BulkFailure {
                            post_id,
                            message: e.to_string(),
                        });
                    }
                }
            }

            if index + 1 < group_count && settings.group_timeout > 0 {
                debug!(seconds = settings.group_timeout, "Pausing between groups");
                sleep(Duration::from_secs(settings.group_timeout)).await;
            }
        }

        info!(
            processed = report.processed,
            skipped = report.skipped,
            replaced = report.replaced,
            failures = report.failures.len(),
            "Bulk pass finished"
        );
        Ok(report)
    }

    /// True when the post's persisted status record says the last run was a
    /// full success. An unreadable record counts as not migrated.
    async fn already_migrated(&self, post_id: PostId) -> bool {
        let Ok(Some(value)) = self.store.get_meta(post_id, META_UPLOAD_STATUS).await else {
            return false;
        };
        serde_json::from_value::<UploadStatus>(value)
            .map(|status| status.status.is_success())
            .unwrap_or(false)
    }
}
