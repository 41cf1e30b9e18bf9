//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! reminder service for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::models::RouteInfo;

use super::dto::{
    AckResponse, CleanupResponse, HealthResponse, InboxListResponse, ListNotificationsQuery,
    NotificationListResponse, NotificationSettings, ScheduleReminderRequest,
    ScheduleReminderResponse,
};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint reporting the current delivery permission state.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        permission: state.service.permission(),
    }))
}

// =============================================================================
// Reminders
// =============================================================================

/// POST /v1/reminders
///
/// Schedule a departure reminder. Returns 400 when the departure time has
/// already passed or the lead time is out of range.
pub async fn schedule_reminder(
    State(state): State<AppState>,
    Json(request): Json<ScheduleReminderRequest>,
) -> HandlerResult<ScheduleReminderResponse> {
    let minutes_before = request
        .minutes_before
        .unwrap_or_else(|| state.service.settings().global().minutes_before);

    let route = RouteInfo {
        route_id: request.route_id,
        plan_id: request.plan_id,
        origin: request.origin,
        destination: request.destination,
        departure_time: request.departure_time,
    };

    let reminder = state
        .service
        .schedule_departure_reminder(&route, minutes_before)?;

    Ok(Json(ScheduleReminderResponse {
        notification: reminder.notification,
        is_immediate: reminder.timing.is_immediate,
    }))
}

// =============================================================================
// Scheduled notifications
// =============================================================================

/// GET /v1/notifications
///
/// List scheduled notifications, optionally filtered to one plan.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> HandlerResult<NotificationListResponse> {
    let notifications = state.service.registry().list(query.plan_id.as_deref());
    let total = notifications.len();

    Ok(Json(NotificationListResponse {
        notifications,
        total,
    }))
}

/// DELETE /v1/notifications/{id}
///
/// Cancel the timer and remove the record.
pub async fn cancel_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<AckResponse> {
    if !state.service.cancel_reminder(&id) {
        return Err(AppError::NotFound(format!("no notification under id {id}")));
    }
    Ok(Json(AckResponse { ok: true }))
}

/// POST /v1/notifications/cleanup
///
/// Run the duplicate and expiry passes and report the counts.
pub async fn cleanup_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> HandlerResult<CleanupResponse> {
    let report = state.service.cleanup_all(query.plan_id.as_deref());
    Ok(Json(CleanupResponse {
        duplicates_removed: report.duplicates_removed,
        expired_removed: report.expired_removed,
        total_removed: report.total(),
    }))
}

// =============================================================================
// Settings
// =============================================================================

/// GET /v1/settings
pub async fn get_settings(State(state): State<AppState>) -> HandlerResult<NotificationSettings> {
    Ok(Json(state.service.settings().global()))
}

/// PUT /v1/settings
///
/// Replace the global settings; missing fields fall back to defaults.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<NotificationSettings>,
) -> HandlerResult<NotificationSettings> {
    if settings.minutes_before > crate::models::MAX_LEAD_MINUTES {
        return Err(AppError::BadRequest(
            "lead time must be between 0 minutes and 24 hours".to_string(),
        ));
    }
    state.service.settings().save_global(settings);
    Ok(Json(state.service.settings().global()))
}

// =============================================================================
// Inbox
// =============================================================================

/// GET /v1/inbox
///
/// Delivered-notification history, newest first, with the unread count.
pub async fn list_inbox(State(state): State<AppState>) -> HandlerResult<InboxListResponse> {
    let notifications = state.service.inbox().list();
    let total = notifications.len();
    let unread = state.service.inbox().unread_count();

    Ok(Json(InboxListResponse {
        notifications,
        total,
        unread,
    }))
}

/// PUT /v1/inbox/{id}/read
pub async fn mark_inbox_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<AckResponse> {
    if !state.service.inbox().mark_read(&id) {
        return Err(AppError::NotFound(format!("no inbox entry under id {id}")));
    }
    Ok(Json(AckResponse { ok: true }))
}

/// PUT /v1/inbox/read-all
pub async fn mark_inbox_all_read(State(state): State<AppState>) -> HandlerResult<AckResponse> {
    Ok(Json(AckResponse {
        ok: state.service.inbox().mark_all_read(),
    }))
}

/// DELETE /v1/inbox/{id}
pub async fn delete_inbox_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<AckResponse> {
    if !state.service.inbox().delete(&id) {
        return Err(AppError::NotFound(format!("no inbox entry under id {id}")));
    }
    Ok(Json(AckResponse { ok: true }))
}
