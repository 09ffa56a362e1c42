use tracing::{debug, warn};

use crate::application::repos::StoreError;
use crate::domain::posts::PostId;

use super::service::{PostsManager, StoreOp};

impl PostsManager {
    /// Replace the list with whatever the store holds now.
    ///
    /// A failed fetch leaves the previous list on screen and does not touch the
    /// operation status; the error is logged and handed back to the caller.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        match self.call(StoreOp::ListAll, self.store.list_all()).await {
            Ok(posts) => {
                let count = posts.len();
                self.state.write().await.posts = posts;
                debug!(target = "postdeck::posts::refresh", count, "posts refreshed");
                Ok(count)
            }
            Err(StoreError::Cancelled) => {
                debug!(target = "postdeck::posts::refresh", "refresh abandoned");
                Err(StoreError::Cancelled)
            }
            Err(err) => {
                warn!(
                    target = "postdeck::posts::refresh",
                    error = %err,
                    "failed to fetch posts"
                );
                Err(err)
            }
        }
    }

    /// Look up a listed post by the text form of its id, as it appears in a
    /// URL or on the command line. The id comes back with its stored variant.
    pub async fn resolve_id(&self, key: &str) -> Option<PostId> {
        self.state
            .read()
            .await
            .posts
            .iter()
            .map(|post| &post.id)
            .find(|id| id.to_string() == key)
            .cloned()
    }
}
