//! Reminder fire-time computation.
//!
//! A reminder fires `minutes_before` minutes ahead of the departure time.
//! Two edge policies apply: a departure already in the past cannot be
//! scheduled at all, and a lead time that has already elapsed (while the
//! departure is still ahead) degrades to a near-immediate notification so the
//! user gets *something* rather than silence.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// Delay applied when the computed fire time has already passed but the
/// departure has not.
pub const IMMEDIATE_FALLBACK_DELAY: Duration = Duration::from_secs(2);

/// Longest accepted lead time, in minutes (24 hours).
pub const MAX_LEAD_MINUTES: u32 = 1440;

/// Outcome of the fire-time computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTiming {
    /// When the notification should fire; `None` when the departure is
    /// already in the past and scheduling must be refused.
    pub notification_time: Option<DateTime<Utc>>,
    /// Distance from now to the fire time. Zero when scheduling is refused.
    pub delay: Duration,
    /// The departure itself has passed.
    pub is_in_past: bool,
    /// The regular fire time had passed, the near-immediate fallback applies.
    pub is_immediate: bool,
}

/// Compute the fire time for a reminder relative to the current instant.
pub fn calculate(departure: DateTime<Utc>, minutes_before: u32) -> ReminderTiming {
    calculate_at(departure, minutes_before, Utc::now())
}

/// Compute the fire time for a reminder relative to an explicit `now`.
pub fn calculate_at(
    departure: DateTime<Utc>,
    minutes_before: u32,
    now: DateTime<Utc>,
) -> ReminderTiming {
    if departure <= now {
        return ReminderTiming {
            notification_time: None,
            delay: Duration::ZERO,
            is_in_past: true,
            is_immediate: false,
        };
    }

    let target = departure - ChronoDuration::minutes(i64::from(minutes_before));
    if target <= now {
        // Lead time already elapsed; fire almost immediately instead of
        // staying silent.
        return ReminderTiming {
            notification_time: Some(
                now + ChronoDuration::from_std(IMMEDIATE_FALLBACK_DELAY)
                    .unwrap_or_else(|_| ChronoDuration::seconds(2)),
            ),
            delay: IMMEDIATE_FALLBACK_DELAY,
            is_in_past: false,
            is_immediate: true,
        };
    }

    ReminderTiming {
        notification_time: Some(target),
        delay: (target - now).to_std().unwrap_or(Duration::ZERO),
        is_in_past: false,
        is_immediate: false,
    }
}

/// Result of validating user-supplied reminder parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsValidation {
    pub errors: Vec<String>,
}

impl SettingsValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate the reminder parameters a settings screen collects: the lead time
/// must be within 0 minutes and 24 hours, and the departure (when provided)
/// must still be in the future.
pub fn validate_reminder_settings(
    minutes_before: u32,
    departure: Option<DateTime<Utc>>,
) -> SettingsValidation {
    let mut errors = Vec::new();

    if minutes_before > MAX_LEAD_MINUTES {
        errors.push("lead time must be between 0 minutes and 24 hours".to_string());
    }

    if let Some(departure) = departure {
        if departure < Utc::now() {
            errors.push("departure time is already in the past".to_string());
        }
    }

    SettingsValidation { errors }
}

/// Human-readable fire time for UI display, e.g. `Aug 6, 02:30 PM`.
pub fn format_fire_time(time: DateTime<Utc>) -> String {
    time.format("%b %-d, %I:%M %p").to_string()
}

#[cfg(test)]
#[path = "timing_tests.rs"]
mod timing_tests;
