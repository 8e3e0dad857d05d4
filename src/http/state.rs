use crate::session::SessionLifecycle;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The session pipeline every endpoint drives.
    pub lifecycle: Arc<SessionLifecycle>,
}

impl AppState {
    pub fn new(lifecycle: Arc<SessionLifecycle>) -> Self {
        Self { lifecycle }
    }
}
