//! Store trait describing the remote persistence adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{Post, PostFields, PostId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Transport(String),
    #[error("store rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("failed to decode store response: {0}")]
    Decode(String),
    #[error("store request cancelled")]
    Cancelled,
}

impl StoreError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// The four capabilities the posts page needs from the hosted table.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every row, in whatever order the store returns them.
    async fn list_all(&self) -> Result<Vec<Post>, StoreError>;

    /// Persist a new row; the store assigns the id.
    async fn insert(&self, fields: &PostFields) -> Result<(), StoreError>;

    async fn update_by_id(&self, id: &PostId, fields: &PostFields) -> Result<(), StoreError>;

    async fn delete_by_id(&self, id: &PostId) -> Result<(), StoreError>;
}
