//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Reminder scheduling
        .route("/reminders", post(handlers::schedule_reminder))
        // Scheduled-notification registry
        .route("/notifications", get(handlers::list_notifications))
        .route("/notifications/cleanup", post(handlers::cleanup_notifications))
        .route("/notifications/{id}", delete(handlers::cancel_notification))
        // Settings
        .route("/settings", get(handlers::get_settings))
        .route("/settings", put(handlers::update_settings))
        // Delivered-notification inbox
        .route("/inbox", get(handlers::list_inbox))
        .route("/inbox/read-all", put(handlers::mark_inbox_all_read))
        .route("/inbox/{id}/read", put(handlers::mark_inbox_read))
        .route("/inbox/{id}", delete(handlers::delete_inbox_entry));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::MemoryBackend;
    use crate::services::ReminderService;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_router_creation() {
        let service = ReminderService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryBackend::new()),
        );
        let state = AppState::new(service);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
