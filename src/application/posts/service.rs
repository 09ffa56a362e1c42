use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use metrics::{counter, histogram};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::application::repos::{PostStore, StoreError};
use crate::domain::posts::Post;

use super::types::{EditorState, OperationStatus, PostsSnapshot};

pub const METRIC_STORE_REQUESTS_TOTAL: &str = "postdeck_store_requests_total";
pub const METRIC_STORE_REQUEST_MS: &str = "postdeck_store_request_ms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StoreOp {
    ListAll,
    Insert,
    UpdateById,
    DeleteById,
}

impl StoreOp {
    fn as_str(self) -> &'static str {
        match self {
            StoreOp::ListAll => "list_all",
            StoreOp::Insert => "insert",
            StoreOp::UpdateById => "update_by_id",
            StoreOp::DeleteById => "delete_by_id",
        }
    }
}

#[derive(Debug, Default)]
pub(super) struct PostsState {
    pub(super) posts: Vec<Post>,
    pub(super) editor: EditorState,
    pub(super) last_error: Option<String>,
}

/// View-model for the posts page.
///
/// Holds the last fetched list, the editor form and the operation status, and
/// keeps them consistent with the store: every successful mutation is followed
/// by a full re-fetch, never a local patch. State locks are never held across
/// a store call, so a render during a save observes `loading == true`.
pub struct PostsManager {
    pub(super) store: Arc<dyn PostStore>,
    pub(super) state: RwLock<PostsState>,
    pub(super) loading: AtomicBool,
    cancel: CancellationToken,
}

impl PostsManager {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            state: RwLock::new(PostsState::default()),
            loading: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    /// Build the manager and run the initial fetch once.
    pub async fn mount(store: Arc<dyn PostStore>) -> Arc<Self> {
        let manager = Arc::new(Self::new(store));
        let _ = manager.refresh().await;
        manager
    }

    pub async fn snapshot(&self) -> PostsSnapshot {
        let state = self.state.read().await;
        PostsSnapshot {
            posts: state.posts.clone(),
            editor: state.editor.clone(),
            status: OperationStatus {
                loading: self.is_loading(),
                last_error: state.last_error.clone(),
            },
        }
    }

    pub async fn is_editor_open(&self) -> bool {
        self.state.read().await.editor.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Abandon every in-flight store request; their results are discarded.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(super) async fn call<T, F>(&self, op: StoreOp, request: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let started = Instant::now();
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(StoreError::Cancelled),
            result = request => result,
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(StoreError::Cancelled) => "cancelled",
            Err(_) => "error",
        };
        counter!(METRIC_STORE_REQUESTS_TOTAL, "op" => op.as_str(), "outcome" => outcome)
            .increment(1);
        histogram!(METRIC_STORE_REQUEST_MS, "op" => op.as_str())
            .record(started.elapsed().as_secs_f64() * 1000.0);

        result
    }
}
