//! Application state for the web layer.

use std::sync::Arc;

use crate::board::BoardService;

/// Shared application state.
pub struct AppState<C> {
    /// Board service shared by all handlers
    pub service: Arc<BoardService<C>>,

    /// Required value of `X-API-Key` on `/v1/*`, if any
    pub api_key: Option<Arc<str>>,
}

impl<C> AppState<C> {
    /// Create a new app state.
    pub fn new(service: BoardService<C>, api_key: Option<String>) -> Self {
        Self {
            service: Arc::new(service),
            api_key: api_key.map(Arc::from),
        }
    }
}

// Not derived: `C` need not be `Clone`.
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            api_key: self.api_key.clone(),
        }
    }
}
