//! Application services layer: the posts view-model and its store seam.

pub mod error;
pub mod posts;
pub mod repos;
