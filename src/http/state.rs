//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::ReminderService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The reminder service composition root.
    pub service: Arc<ReminderService>,
}

impl AppState {
    /// Create a new application state around the given service.
    pub fn new(service: Arc<ReminderService>) -> Self {
        Self { service }
    }
}
