//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedClient;
use crate::engine::Tracker;
use crate::olhovivo::OlhoVivoClient;

/// The production API stack: real client behind the line cache.
pub type ApiClient = CachedClient<OlhoVivoClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Upstream API, used directly for line search proxying.
    pub api: Arc<ApiClient>,

    /// The polling tracker that owns the published snapshot.
    pub tracker: Arc<Tracker<ApiClient>>,
}

impl AppState {
    /// Create a new app state around a shared API client.
    pub fn new(api: Arc<ApiClient>, tracker: Tracker<ApiClient>) -> Self {
        Self {
            api,
            tracker: Arc::new(tracker),
        }
    }
}
