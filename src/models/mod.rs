//! Domain types for the reminder engine: notification records, kind presets,
//! permission states, and the fire-time computation.

pub mod notification;
pub mod timing;

pub use notification::{
    KindPreset, NewScheduledNotification, NotificationKind, NotificationStatus, Permission,
    RouteInfo, ScheduledNotification,
};
pub use timing::{
    calculate, calculate_at, format_fire_time, validate_reminder_settings, ReminderTiming,
    SettingsValidation, IMMEDIATE_FALLBACK_DELAY, MAX_LEAD_MINUTES,
};
