//! High-level reminder services.
//!
//! [`ReminderService`] is the composition root: it owns the registry, the
//! timer scheduler, the notifier, settings and the inbox, and implements the
//! end-to-end flows (schedule, cancel, fire, startup reconciliation).
//! [`cleanup`] holds the registry maintenance passes; [`config`] the TOML
//! configuration.

pub mod cleanup;
pub mod config;
pub mod reminders;

pub use cleanup::{cleanup_all, cleanup_duplicates, cleanup_expired, CleanupReport};
pub use config::ReminderConfig;
pub use reminders::{
    ExportedState, ReminderError, ReminderService, ScheduledReminder, EXPORT_VERSION,
};
