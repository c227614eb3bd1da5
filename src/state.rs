//! Shared application state for all routes.

use crate::config::ResolvedModel;
use crate::store::ResourceStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceStore>,
    pub model: Arc<ResolvedModel>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>, model: ResolvedModel) -> Self {
        Self {
            store,
            model: Arc::new(model),
        }
    }
}
