use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::DocumentStore;

/// Process-wide dependencies, constructed once in `main` and injected into
/// every handler. The store wraps a connection pool and is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: DocumentStore, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
