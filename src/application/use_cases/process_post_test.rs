#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use bytes::Bytes;

    use crate::application::use_cases::ProcessPostUseCase;
    use crate::domain::entities::{
        IurSettings, META_LAST_PROCESSED, META_UPLOAD_STATUS, Post, PostId, StatusKind,
        UploadStatus,
    };
    use crate::domain::errors::{FetchError, ProcessError};
    use crate::domain::ports::mocks::{MemoryFailureLog, MockImageHost};
    use crate::domain::ports::{FetchedImage, MockImageFetchPort, filename_from_url};
    use crate::infrastructure::store::MemoryContentStore;

    fn settings() -> IurSettings {
        let mut settings = IurSettings::default();
        settings.freeimage.api_key = "test-key".to_owned();
        settings
    }

    fn post(id: u64, content: &str) -> Post {
        Post {
            id: PostId::new(id),
            post_type: "post".to_owned(),
            title: format!("post {id}"),
            content: content.to_owned(),
            featured_image: None,
            custom_fields: HashMap::new(),
        }
    }

    fn fetcher_ok() -> MockImageFetchPort {
        let mut fetcher = MockImageFetchPort::new();
        fetcher.expect_fetch().returning(|url| {
            Ok(FetchedImage {
                bytes: Bytes::from_static(b"\xff\xd8\xff"),
                content_type: Some("image/jpeg".to_owned()),
                filename: filename_from_url(url),
            })
        });
        fetcher
    }

    struct Harness {
        store: Arc<MemoryContentStore>,
        host: Arc<MockImageHost>,
        log: Arc<MemoryFailureLog>,
        processor: ProcessPostUseCase,
    }

    fn harness(host: MockImageHost, fetcher: MockImageFetchPort) -> Harness {
        let store = Arc::new(MemoryContentStore::new());
        let host = Arc::new(host);
        let log = Arc::new(MemoryFailureLog::new());
        let processor = ProcessPostUseCase::new(
            store.clone(),
            host.clone(),
            Arc::new(fetcher),
            log.clone(),
        );
        Harness {
            store,
            host,
            log,
            processor,
        }
    }

    async fn stored_status(store: &MemoryContentStore, id: PostId) -> UploadStatus {
        let value = store.meta(id, META_UPLOAD_STATUS).await.unwrap();
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_all_uploads_succeed() {
        let h = harness(MockImageHost::new(), fetcher_ok());
        h.store
            .insert_post(post(
                1,
                r#"<img src="https://example.com/a.jpg"><img src="https://example.com/b.png">"#,
            ))
            .await;

        let report = h.processor.execute(PostId::new(1), &settings()).await.unwrap();

        assert_eq!(report.replaced, 2);
        assert!(report.errors.is_empty());

        let updated = h.store.post(PostId::new(1)).await.unwrap();
        assert!(!updated.content.contains("https://example.com/a.jpg"));
        assert!(!updated.content.contains("https://example.com/b.png"));
        assert!(updated.content.contains(&MockImageHost::hosted_url("a.jpg")));
        assert!(updated.content.contains(&MockImageHost::hosted_url("b.png")));

        let status = stored_status(&h.store, PostId::new(1)).await;
        assert_eq!(status.status, StatusKind::Success);
        assert_eq!(status.service, "freeimage");
        assert_eq!(status.images.len(), 2);
        assert!(status.images.iter().all(|o| o.success));
    }

    #[tokio::test]
    async fn test_duplicate_url_uploads_once_rewrites_all() {
        let h = harness(MockImageHost::new(), fetcher_ok());
        h.store
            .insert_post(post(
                1,
                r#"<img src="https://example.com/a.jpg"> <img src="https://example.com/a.jpg">"#,
            ))
            .await;

        let report = h.processor.execute(PostId::new(1), &settings()).await.unwrap();

        assert_eq!(report.replaced, 1);
        assert_eq!(h.host.upload_count(), 1);

        let updated = h.store.post(PostId::new(1)).await.unwrap();
        assert!(!updated.content.contains("https://example.com/a.jpg"));
        assert_eq!(
            updated.content.matches(&MockImageHost::hosted_url("a.jpg")).count(),
            2
        );

        let status = stored_status(&h.store, PostId::new(1)).await;
        assert_eq!(status.images.len(), 1);
    }

    #[tokio::test]
    async fn test_one_failure_yields_partial_status() {
        let host = MockImageHost::new().fail_for("bad.jpg", "quota exceeded");
        let h = harness(host, fetcher_ok());
        h.store
            .insert_post(post(
                1,
                r#"<img src="https://example.com/ok.jpg"><img src="https://example.com/bad.jpg">"#,
            ))
            .await;

        let report = h.processor.execute(PostId::new(1), &settings()).await.unwrap();

        assert_eq!(report.replaced, 1);
        assert_eq!(report.errors.len(), 1);

        let updated = h.store.post(PostId::new(1)).await.unwrap();
        assert!(updated.content.contains("https://example.com/bad.jpg"));
        assert!(!updated.content.contains("https://example.com/ok.jpg"));

        let status = stored_status(&h.store, PostId::new(1)).await;
        assert_eq!(status.status, StatusKind::Partial);
        let failed: Vec<_> = status.images.iter().filter(|o| !o.success).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].original_url, "https://example.com/bad.jpg");
        assert!(failed[0].error.as_deref().unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_isolated() {
        let mut fetcher = MockImageFetchPort::new();
        fetcher.expect_fetch().returning(|url| {
            if url.contains("gone") {
                Err(FetchError::Http {
                    url: url.to_owned(),
                    status: 404,
                })
            } else {
                Ok(FetchedImage {
                    bytes: Bytes::from_static(b"img"),
                    content_type: Some("image/png".to_owned()),
                    filename: filename_from_url(url),
                })
            }
        });
        let h = harness(MockImageHost::new(), fetcher);
        h.store
            .insert_post(post(
                1,
                r#"<img src="https://example.com/gone.png"><img src="https://example.com/here.png">"#,
            ))
            .await;

        let report = h.processor.execute(PostId::new(1), &settings()).await.unwrap();

        assert_eq!(report.replaced, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("404"));
        assert!(!h.log.read_all().is_empty());
    }

    #[tokio::test]
    async fn test_fully_migrated_post_is_a_no_op() {
        let h = harness(MockImageHost::new(), {
            let mut fetcher = MockImageFetchPort::new();
            fetcher.expect_fetch().never();
            fetcher
        });
        h.store
            .insert_post(post(1, r#"<img src="https://iili.io/already.jpg">"#))
            .await;

        let report = h.processor.execute(PostId::new(1), &settings()).await.unwrap();

        assert_eq!(report.replaced, 0);
        assert_eq!(h.host.upload_count(), 0);

        let status = stored_status(&h.store, PostId::new(1)).await;
        assert_eq!(status.status, StatusKind::Success);
        assert!(status.images.is_empty());
        assert!(h.store.meta(PostId::new(1), META_LAST_PROCESSED).await.is_some());
    }

    #[tokio::test]
    async fn test_ineligible_post_is_untouched() {
        let h = harness(MockImageHost::new(), MockImageFetchPort::new());
        let mut page = post(1, r#"<img src="https://example.com/a.jpg">"#);
        page.post_type = "page".to_owned();
        h.store.insert_post(page).await;

        let err = h
            .processor
            .execute(PostId::new(1), &settings())
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::NotFound { .. }));
        assert_eq!(err.code(), 404);

        let untouched = h.store.post(PostId::new(1)).await.unwrap();
        assert!(untouched.content.contains("https://example.com/a.jpg"));
        assert!(h.store.meta(PostId::new(1), META_UPLOAD_STATUS).await.is_none());
        assert!(h.store.meta(PostId::new(1), META_LAST_PROCESSED).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_post_id() {
        let h = harness(MockImageHost::new(), MockImageFetchPort::new());

        let err = h
            .processor
            .execute(PostId::new(99), &settings())
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_fast() {
        let h = harness(MockImageHost::new(), MockImageFetchPort::new());
        h.store
            .insert_post(post(1, r#"<img src="https://example.com/a.jpg">"#))
            .await;

        let err = h
            .processor
            .execute(PostId::new(1), &IurSettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::Config { .. }));
        assert_eq!(err.code(), 500);
        assert!(!h.log.read_all().is_empty());
    }

    #[tokio::test]
    async fn test_featured_and_custom_field_rewrites() {
        let h = harness(MockImageHost::new(), fetcher_ok());
        let mut item = post(1, "");
        item.featured_image = Some("https://example.com/hero.jpg".to_owned());
        item.custom_fields
            .insert("banner".to_owned(), "https://example.com/banner.jpg".to_owned());
        h.store.insert_post(item).await;

        let mut settings = settings();
        settings.process_custom_fields = true;
        settings.custom_field_keys = vec!["banner".to_owned()];

        let report = h.processor.execute(PostId::new(1), &settings).await.unwrap();
        assert_eq!(report.replaced, 2);

        let updated = h.store.post(PostId::new(1)).await.unwrap();
        assert_eq!(
            updated.featured_image.as_deref(),
            Some(MockImageHost::hosted_url("hero.jpg").as_str())
        );
        assert_eq!(
            updated.custom_fields.get("banner").map(String::as_str),
            Some(MockImageHost::hosted_url("banner.jpg").as_str())
        );
    }

    #[tokio::test]
    async fn test_deletion_failure_is_a_warning_not_an_error() {
        let h = harness(MockImageHost::new(), fetcher_ok());
        h.store
            .insert_post(post(1, r#"<img src="https://example.com/a.jpg">"#))
            .await;
        h.store.insert_attachment(5, "https://example.com/a.jpg").await;
        h.store.set_fail_deletions(true);

        let mut settings = settings();
        settings.delete_after_replace = true;

        let report = h.processor.execute(PostId::new(1), &settings).await.unwrap();

        assert_eq!(report.replaced, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.errors.is_empty());

        let status = stored_status(&h.store, PostId::new(1)).await;
        assert_eq!(status.status, StatusKind::Success);
        assert!(status.images[0].success);
    }

    #[tokio::test]
    async fn test_successful_deletion_removes_attachment() {
        let h = harness(MockImageHost::new(), fetcher_ok());
        h.store
            .insert_post(post(1, r#"<img src="https://example.com/a.jpg">"#))
            .await;
        h.store.insert_attachment(5, "https://example.com/a.jpg").await;

        let mut settings = settings();
        settings.delete_after_replace = true;

        let report = h.processor.execute(PostId::new(1), &settings).await.unwrap();

        assert!(report.warnings.is_empty());
        assert_eq!(h.store.deleted().await, vec!["https://example.com/a.jpg"]);
    }

    #[tokio::test]
    async fn test_rerun_overwrites_status_record() {
        let host = MockImageHost::new().fail_for("bad.jpg", "down");
        let h = harness(host, fetcher_ok());
        h.store
            .insert_post(post(
                1,
                r#"<img src="https://example.com/ok.jpg"><img src="https://example.com/bad.jpg">"#,
            ))
            .await;

        let first = h.processor.execute(PostId::new(1), &settings()).await.unwrap();
        assert_eq!(first.replaced, 1);
        assert_eq!(
            stored_status(&h.store, PostId::new(1)).await.status,
            StatusKind::Partial
        );

        // Second run only sees the still-foreign URL; the record is replaced,
        // not merged with the first run's two entries.
        let second = h.processor.execute(PostId::new(1), &settings()).await.unwrap();
        assert_eq!(second.replaced, 0);

        let status = stored_status(&h.store, PostId::new(1)).await;
        assert_eq!(status.images.len(), 1);
        assert_eq!(status.images[0].original_url, "https://example.com/bad.jpg");
        assert_eq!(status.status, StatusKind::Failed);
    }
}
