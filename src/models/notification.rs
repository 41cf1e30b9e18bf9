//! Core notification record types shared across the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a travel notification. Selects the presentation preset used
/// when the notification is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Departure,
    Traffic,
    Weather,
    Arrival,
}

impl NotificationKind {
    /// Presentation preset for this kind: icon, title, default body, the tag
    /// used for OS-level notification collapsing, and whether the notification
    /// should stay on screen until the user interacts with it.
    pub fn preset(&self) -> KindPreset {
        match self {
            NotificationKind::Departure => KindPreset {
                icon: "🚗",
                title: "Departure reminder",
                default_body: "Time to leave soon!",
                tag: "departure-reminder",
                require_interaction: true,
            },
            NotificationKind::Traffic => KindPreset {
                icon: "🚦",
                title: "Traffic conditions changed",
                default_body: "Traffic on your route has changed",
                tag: "traffic-update",
                require_interaction: false,
            },
            NotificationKind::Weather => KindPreset {
                icon: "🌧️",
                title: "Weather alert",
                default_body: "The weather has changed. Check what to pack",
                tag: "weather-alert",
                require_interaction: false,
            },
            NotificationKind::Arrival => KindPreset {
                icon: "🏁",
                title: "Arrival reminder",
                default_body: "You are close to your destination",
                tag: "arrival-reminder",
                require_interaction: false,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Departure => "departure",
            NotificationKind::Traffic => "traffic",
            NotificationKind::Weather => "weather",
            NotificationKind::Arrival => "arrival",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static presentation attributes for one [`NotificationKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPreset {
    pub icon: &'static str,
    pub title: &'static str,
    pub default_body: &'static str,
    pub tag: &'static str,
    pub require_interaction: bool,
}

/// Lifecycle status of a persisted notification record.
///
/// Only `Scheduled` vs. absent is load-bearing for the cleanup passes;
/// `Fired` and `Cancelled` exist so observers can render history before the
/// record is pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Scheduled,
    Fired,
    Cancelled,
}

/// Authorization state of the platform notification surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// The user has not been asked yet.
    Default,
    Granted,
    Denied,
    /// The host environment has no notification surface at all.
    Unsupported,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Permission::Default => "default",
            Permission::Granted => "granted",
            Permission::Denied => "denied",
            Permission::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// A persisted intent to deliver a notification at a future time.
///
/// The `id` is both the record identity in the registry and the cancellation
/// handle for the armed timer. Later saves under the same id overwrite
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Intended fire time.
    pub scheduled_time: DateTime<Utc>,
    pub kind: NotificationKind,
    /// Opaque reference to the owning route; no referential integrity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    /// Opaque reference to the owning trip plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for [`crate::store::ScheduledNotificationStore::save`]. The registry
/// fills in identity, status and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScheduledNotification {
    /// Caller-supplied id; generated as `notification_<unix-millis>` when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub body: String,
    pub scheduled_time: DateTime<Utc>,
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
}

/// Route details a caller hands to the reminder flow. Everything except the
/// departure time is optional display/bookkeeping data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Display name of the departure location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Display name of the destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub departure_time: DateTime<Utc>,
}
