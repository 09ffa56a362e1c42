mod forms;
mod handlers;
mod middleware;
mod state;

pub use state::AppState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use self::middleware::{log_responses, set_request_context};

/// The posts page plus the form actions it posts back to.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::posts_page))
        .route("/editor/new", post(handlers::open_create_editor))
        .route("/editor/close", post(handlers::close_editor))
        .route("/editor/save", post(handlers::save_editor))
        .route("/posts/{id}/edit", post(handlers::open_edit_editor))
        .route("/posts/{id}/delete", post(handlers::delete_post))
        .route("/_health", get(handlers::health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
