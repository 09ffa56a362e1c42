use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::posts::{Post, PostId};

/// What a save will do with the drafts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Create,
    Edit(PostId),
}

impl EditorMode {
    /// Message surfaced to the user when the save for this mode fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            EditorMode::Create => "Error adding post",
            EditorMode::Edit(_) => "Error updating post",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            EditorMode::Create => "insert",
            EditorMode::Edit(_) => "update",
        }
    }
}

/// Transient create/edit form. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    pub visible: bool,
    pub mode: EditorMode,
    pub title_draft: String,
    pub content_draft: String,
}

impl EditorState {
    pub fn for_create() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn for_edit(post: &Post) -> Self {
        Self {
            visible: true,
            mode: EditorMode::Edit(post.id.clone()),
            title_draft: post.title.clone(),
            content_draft: post.content.clone(),
        }
    }

    pub fn target_id(&self) -> Option<&PostId> {
        match &self.mode {
            EditorMode::Create => None,
            EditorMode::Edit(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    pub(super) fn action(&self) -> &'static str {
        self.mode.action()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationStatus {
    pub loading: bool,
    pub last_error: Option<String>,
}

/// Everything a view needs to render the page at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostsSnapshot {
    pub posts: Vec<Post>,
    pub editor: EditorState,
    pub status: OperationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A draft was blank; nothing happened.
    Skipped,
    Saved,
    /// The store refused the write; `last_error` holds the message.
    Failed,
    /// The manager shut down while the write was in flight.
    Cancelled,
}

/// Clears the loading flag on every exit path, including cancellation.
pub(super) struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    pub(super) fn acquire(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
