use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::{
    application::{error::AppError, posts::SaveOutcome, repos::StoreError},
    presentation::views::{
        PostsPageTemplate, PostsPageView, render_not_found_response, render_template_response,
    },
};

use super::{AppState, forms::EditorForm};

const PAGE_PATH: &str = "/";

fn back_to_page() -> Redirect {
    Redirect::to(PAGE_PATH)
}

pub(super) async fn posts_page(State(state): State<AppState>) -> Response {
    let view = PostsPageView::from(state.posts.snapshot().await);
    render_template_response(PostsPageTemplate { view }, StatusCode::OK)
}

pub(super) async fn open_create_editor(State(state): State<AppState>) -> Redirect {
    state.posts.open_create_editor().await;
    back_to_page()
}

pub(super) async fn open_edit_editor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = state.posts.resolve_id(&raw_id).await else {
        debug!(target = "postdeck::http::posts", id = %raw_id, "edit target not listed");
        return render_not_found_response();
    };

    match state.posts.open_edit_editor_by_id(&id).await {
        Ok(()) => back_to_page().into_response(),
        Err(err) => {
            debug!(target = "postdeck::http::posts", id = %id, error = %err, "edit target missing");
            render_not_found_response()
        }
    }
}

pub(super) async fn close_editor(State(state): State<AppState>) -> Redirect {
    state.posts.close_editor().await;
    back_to_page()
}

pub(super) async fn save_editor(
    State(state): State<AppState>,
    Form(form): Form<EditorForm>,
) -> Response {
    // A stale tab may post after the editor was closed.
    if !state.posts.is_editor_open().await {
        return back_to_page().into_response();
    }
    state.posts.update_drafts(form.title, form.content).await;
    match state.posts.save().await {
        SaveOutcome::Cancelled => AppError::Store(StoreError::Cancelled).into_response(),
        SaveOutcome::Saved | SaveOutcome::Skipped | SaveOutcome::Failed => {
            back_to_page().into_response()
        }
    }
}

/// Delete failures are logged by the manager and otherwise ignored here.
pub(super) async fn delete_post(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = state.posts.resolve_id(&raw_id).await else {
        debug!(target = "postdeck::http::posts", id = %raw_id, "delete target not listed");
        return render_not_found_response();
    };

    match state.posts.delete_post(&id).await {
        Err(StoreError::Cancelled) => AppError::Store(StoreError::Cancelled).into_response(),
        Ok(()) | Err(_) => back_to_page().into_response(),
    }
}

pub(super) async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
