//! Shared application state for all routes.

use std::sync::Arc;

use crate::descriptor::Registry;
use crate::service::Pipeline;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub pipeline: Arc<Pipeline>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, store: Arc<dyn DocumentStore>) -> Self {
        AppState {
            registry,
            pipeline: Arc::new(Pipeline::new(store.clone())),
            store,
        }
    }

    pub fn with_pipeline(
        registry: Arc<Registry>,
        store: Arc<dyn DocumentStore>,
        pipeline: Pipeline,
    ) -> Self {
        AppState {
            registry,
            pipeline: Arc::new(pipeline),
            store,
        }
    }
}
