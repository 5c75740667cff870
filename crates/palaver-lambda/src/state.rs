use std::sync::Arc;

use palaver_bedrock::families::ModelRegistry;

/// Shared application state, injected into all route handlers via Axum state.
pub struct AppState<I, S> {
    pub inference: Arc<I>,
    pub store: Arc<S>,
    pub registry: Arc<ModelRegistry>,
    pub default_model_id: Arc<str>,
}

impl<I, S> AppState<I, S> {
    /// State with the standard model families.
    pub fn new(inference: I, store: S, default_model_id: impl Into<String>) -> Self {
        Self::from_parts(
            Arc::new(inference),
            Arc::new(store),
            ModelRegistry::default(),
            default_model_id,
        )
    }

    pub fn from_parts(
        inference: Arc<I>,
        store: Arc<S>,
        registry: ModelRegistry,
        default_model_id: impl Into<String>,
    ) -> Self {
        Self {
            inference,
            store,
            registry: Arc::new(registry),
            default_model_id: Arc::from(default_model_id.into()),
        }
    }
}

impl<I, S> Clone for AppState<I, S> {
    fn clone(&self) -> Self {
        Self {
            inference: Arc::clone(&self.inference),
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            default_model_id: Arc::clone(&self.default_model_id),
        }
    }
}
