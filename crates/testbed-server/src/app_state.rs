use std::sync::Arc;

use testbed_core::traits::EntityStore;

/// Shared application state with injected dependencies.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
}
