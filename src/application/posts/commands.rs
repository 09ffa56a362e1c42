use tracing::{debug, error, info};

use crate::application::repos::StoreError;
use crate::domain::error::DomainError;
use crate::domain::posts::{Post, PostFields, PostId};

use super::service::{PostsManager, StoreOp};
use super::types::{EditorMode, EditorState, LoadingGuard, SaveOutcome};

impl PostsManager {
    pub async fn open_create_editor(&self) {
        self.state.write().await.editor = EditorState::for_create();
    }

    pub async fn open_edit_editor(&self, post: &Post) {
        self.state.write().await.editor = EditorState::for_edit(post);
    }

    /// Open the editor for a post in the currently displayed list.
    pub async fn open_edit_editor_by_id(&self, id: &PostId) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let editor = state
            .posts
            .iter()
            .find(|post| &post.id == id)
            .map(EditorState::for_edit)
            .ok_or_else(|| DomainError::not_found("post"))?;
        state.editor = editor;
        Ok(())
    }

    /// Hide the editor. Drafts are kept.
    pub async fn close_editor(&self) {
        self.state.write().await.editor.visible = false;
    }

    pub async fn update_drafts(&self, title: impl Into<String>, content: impl Into<String>) {
        let mut state = self.state.write().await;
        state.editor.title_draft = title.into();
        state.editor.content_draft = content.into();
    }

    pub async fn set_title_draft(&self, title: impl Into<String>) {
        self.state.write().await.editor.title_draft = title.into();
    }

    pub async fn set_content_draft(&self, content: impl Into<String>) {
        self.state.write().await.editor.content_draft = content.into();
    }

    /// Write the drafts to the store.
    ///
    /// Blank drafts make this a no-op. On success the list is re-fetched and
    /// the editor resets to a hidden blank create form; on failure the editor
    /// stays open with its drafts and `last_error` carries a fixed message.
    pub async fn save(&self) -> SaveOutcome {
        let (mode, action, fields) = {
            let state = self.state.read().await;
            let editor = &state.editor;
            match PostFields::new(editor.title_draft.clone(), editor.content_draft.clone()) {
                Ok(fields) => (editor.mode.clone(), editor.action(), fields),
                Err(err) => {
                    debug!(target = "postdeck::posts::save", reason = %err, "save skipped");
                    return SaveOutcome::Skipped;
                }
            }
        };

        let _loading = LoadingGuard::acquire(&self.loading);
        self.state.write().await.last_error = None;

        let result = match &mode {
            EditorMode::Edit(id) => {
                self.call(StoreOp::UpdateById, self.store.update_by_id(id, &fields))
                    .await
            }
            EditorMode::Create => self.call(StoreOp::Insert, self.store.insert(&fields)).await,
        };

        match result {
            Ok(()) => {
                info!(target = "postdeck::posts::save", action, "post saved");
                let _ = self.refresh().await;
                self.state.write().await.editor = EditorState::default();
                SaveOutcome::Saved
            }
            Err(StoreError::Cancelled) => {
                debug!(target = "postdeck::posts::save", action, "save abandoned");
                SaveOutcome::Cancelled
            }
            Err(err) => {
                let message = mode.failure_message();
                error!(
                    target = "postdeck::posts::save",
                    action,
                    error = %err,
                    "{message}"
                );
                self.state.write().await.last_error = Some(message.to_string());
                SaveOutcome::Failed
            }
        }
    }

    /// Remove a post and re-fetch the list.
    ///
    /// Failures are logged and returned but never written to `last_error`;
    /// the page stays silent about them.
    pub async fn delete_post(&self, id: &PostId) -> Result<(), StoreError> {
        match self
            .call(StoreOp::DeleteById, self.store.delete_by_id(id))
            .await
        {
            Ok(()) => {
                info!(target = "postdeck::posts::delete", id = %id, "post deleted");
                let _ = self.refresh().await;
                Ok(())
            }
            Err(StoreError::Cancelled) => {
                debug!(target = "postdeck::posts::delete", id = %id, "delete abandoned");
                Err(StoreError::Cancelled)
            }
            Err(err) => {
                error!(
                    target = "postdeck::posts::delete",
                    id = %id,
                    error = %err,
                    "Error deleting post"
                );
                Err(err)
            }
        }
    }
}
