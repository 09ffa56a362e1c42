use std::sync::Arc;

use crate::application::posts::PostsManager;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostsManager>,
}

impl AppState {
    pub fn new(posts: Arc<PostsManager>) -> Self {
        Self { posts }
    }
}
