mod commands;
mod queries;
mod service;
pub mod types;


pub use service::{METRIC_STORE_REQUEST_MS, METRIC_STORE_REQUESTS_TOTAL, PostsManager};
pub use types::{EditorMode, EditorState, OperationStatus, PostsSnapshot, SaveOutcome};
