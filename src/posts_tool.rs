use std::sync::Arc;

use serde::Serialize;

use postdeck::application::error::AppError;
use postdeck::application::posts::{PostsManager, SaveOutcome};
use postdeck::application::repos::PostStore;
use postdeck::config::PostsAction;
use postdeck::domain::error::DomainError;
use postdeck::domain::posts::PostId;

pub async fn run(store: Arc<dyn PostStore>, action: PostsAction) -> Result<(), AppError> {
    let manager = PostsManager::new(store);

    match action {
        PostsAction::List => {
            manager.refresh().await?;
            print_json(&manager.snapshot().await.posts)
        }
        PostsAction::Add { title, content } => {
            manager.open_create_editor().await;
            manager.update_drafts(title, content).await;
            finish_save(&manager).await
        }
        PostsAction::Edit { id, title, content } => {
            let id = resolve(&manager, &id).await?;
            manager.open_edit_editor_by_id(&id).await?;
            if let Some(title) = title {
                manager.set_title_draft(title).await;
            }
            if let Some(content) = content {
                manager.set_content_draft(content).await;
            }
            finish_save(&manager).await
        }
        PostsAction::Delete { id } => {
            let id = resolve(&manager, &id).await?;
            manager.delete_post(&id).await?;
            println!("Deleted post {id}");
            Ok(())
        }
    }
}

/// Fetch the list and find the post whose id prints as `key`.
async fn resolve(manager: &PostsManager, key: &str) -> Result<PostId, AppError> {
    manager.refresh().await?;
    manager
        .resolve_id(key)
        .await
        .ok_or_else(|| DomainError::not_found("post").into())
}

async fn finish_save(manager: &PostsManager) -> Result<(), AppError> {
    match manager.save().await {
        SaveOutcome::Saved => print_json(&manager.snapshot().await.posts),
        SaveOutcome::Skipped => Err(AppError::validation(
            "title and content must both be non-blank",
        )),
        SaveOutcome::Failed => {
            let message = manager
                .snapshot()
                .await
                .status
                .last_error
                .unwrap_or_else(|| "save failed".to_string());
            Err(AppError::unexpected(message))
        }
        SaveOutcome::Cancelled => Err(AppError::unexpected("save cancelled")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to render output: {err}")))?;
    println!("{out}");
    Ok(())
}
