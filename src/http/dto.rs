//! Data Transfer Objects for the HTTP API.
//!
//! Most domain types already derive Serialize/Deserialize and are re-exported
//! here; the request/response wrappers below exist only for the REST surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export domain types that already serialize.
pub use crate::models::{NotificationKind, NotificationStatus, Permission, ScheduledNotification};
pub use crate::store::{NotificationSettings, ReceivedNotification};

/// Request body for scheduling a departure reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReminderRequest {
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    /// Display name of the departure location
    #[serde(default)]
    pub origin: Option<String>,
    /// Display name of the destination
    #[serde(default)]
    pub destination: Option<String>,
    pub departure_time: DateTime<Utc>,
    /// Lead time in minutes; defaults to the stored global setting
    #[serde(default)]
    pub minutes_before: Option<u32>,
}

/// Response for a scheduled reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReminderResponse {
    pub notification: ScheduledNotification,
    /// The reminder degraded to the near-immediate fallback
    pub is_immediate: bool,
}

/// Query parameters for listing scheduled notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub plan_id: Option<String>,
}

/// Scheduled-notification listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<ScheduledNotification>,
    pub total: usize,
}

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub duplicates_removed: usize,
    pub expired_removed: usize,
    pub total_removed: usize,
}

/// Inbox listing with the unread badge count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxListResponse {
    pub notifications: Vec<ReceivedNotification>,
    pub total: usize,
    pub unread: usize,
}

/// Generic acknowledgement for removals and status flips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Current notification permission state
    pub permission: Permission,
}
