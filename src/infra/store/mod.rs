//! Post store adapters.

pub mod memory;
pub mod rest;

use std::sync::Arc;

use crate::application::repos::PostStore;
use crate::config::{StoreBackend, StoreSettings};
use crate::infra::error::InfraError;

pub use memory::MemoryPostStore;
pub use rest::RestPostStore;

/// Build the adapter selected by the settings.
pub fn build_store(settings: &StoreSettings) -> Result<Arc<dyn PostStore>, InfraError> {
    match &settings.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryPostStore::new())),
        StoreBackend::Rest { url, api_key } => Ok(Arc::new(RestPostStore::new(
            url,
            &settings.rest_path,
            &settings.table,
            api_key.clone(),
            settings.timeout,
        )?)),
    }
}
