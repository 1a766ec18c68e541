use std::sync::Arc;

use storage::ObjectStore;

/// Shared request-handler state, constructed once at startup.
/// `bucket` is only used to annotate error responses; the store itself
/// already knows which bucket it talks to.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self { store, bucket: bucket.into() }
    }
}
