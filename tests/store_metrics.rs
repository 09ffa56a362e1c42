use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::debugging::DebuggingRecorder;

use postdeck::application::posts::{
    METRIC_STORE_REQUEST_MS, METRIC_STORE_REQUESTS_TOTAL, PostsManager, SaveOutcome,
};
use postdeck::application::repos::{PostStore, StoreError};
use postdeck::domain::posts::{Post, PostFields, PostId};
use postdeck::infra::store::MemoryPostStore;

/// Accepts reads, rejects every write.
struct ReadOnlyStore;

#[async_trait]
impl PostStore for ReadOnlyStore {
    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _fields: &PostFields) -> Result<(), StoreError> {
        Err(StoreError::Rejected {
            status: 403,
            message: "read only".to_string(),
        })
    }

    async fn update_by_id(&self, _id: &PostId, _fields: &PostFields) -> Result<(), StoreError> {
        Err(StoreError::transport("read only"))
    }

    async fn delete_by_id(&self, _id: &PostId) -> Result<(), StoreError> {
        Err(StoreError::transport("read only"))
    }
}

#[tokio::test]
async fn store_calls_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let manager = PostsManager::mount(Arc::new(MemoryPostStore::new())).await;
    manager.open_create_editor().await;
    manager.update_drafts("Title", "Body").await;
    assert_eq!(manager.save().await, SaveOutcome::Saved);
    manager
        .delete_post(&PostId::Number(1))
        .await
        .expect("delete");

    let failing = PostsManager::mount(Arc::new(ReadOnlyStore)).await;
    failing.open_create_editor().await;
    failing.update_drafts("Title", "Body").await;
    assert_eq!(failing.save().await, SaveOutcome::Failed);

    failing.shutdown();
    assert!(failing.refresh().await.is_err());

    let entries = snapshotter.snapshot().into_vec();

    let names: HashSet<String> = entries
        .iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();
    assert!(names.contains(METRIC_STORE_REQUESTS_TOTAL));
    assert!(names.contains(METRIC_STORE_REQUEST_MS));

    let counters: HashSet<(String, String)> = entries
        .iter()
        .filter(|(composite_key, _, _, _)| {
            composite_key.key().name() == METRIC_STORE_REQUESTS_TOTAL
        })
        .map(|(composite_key, _, _, _)| {
            let label = |name: &str| {
                composite_key
                    .key()
                    .labels()
                    .find(|label| label.key() == name)
                    .map(|label| label.value().to_string())
                    .unwrap_or_default()
            };
            (label("op"), label("outcome"))
        })
        .collect();

    for expected in [
        ("list_all", "ok"),
        ("insert", "ok"),
        ("delete_by_id", "ok"),
        ("insert", "error"),
        ("list_all", "cancelled"),
    ] {
        assert!(
            counters.contains(&(expected.0.to_string(), expected.1.to_string())),
            "missing counter {expected:?} in {counters:?}"
        );
    }
}
