//! In-process store for local demos and tests.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::repos::{PostStore, StoreError};
use crate::domain::posts::{Post, PostFields, PostId};

/// Rows live in insertion order; ids are increasing integers.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    rows: Mutex<Vec<Post>>,
    last_id: AtomicI64,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        let last_id = posts
            .iter()
            .filter_map(|post| match post.id {
                PostId::Number(id) => Some(id),
                PostId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            rows: Mutex::new(posts),
            last_id: AtomicI64::new(last_id),
        }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.rows.lock().await.clone())
    }

    async fn insert(&self, fields: &PostFields) -> Result<(), StoreError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().await.push(Post {
            id: PostId::Number(id),
            title: fields.title.clone(),
            content: fields.content.clone(),
        });
        Ok(())
    }

    async fn update_by_id(&self, id: &PostId, fields: &PostFields) -> Result<(), StoreError> {
        // Like a filtered PATCH, a missing id matches zero rows and still succeeds.
        if let Some(row) = self.rows.lock().await.iter_mut().find(|row| &row.id == id) {
            row.title = fields.title.clone();
            row.content = fields.content.clone();
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &PostId) -> Result<(), StoreError> {
        self.rows.lock().await.retain(|row| &row.id != id);
        Ok(())
    }
}
