//! The reminder service: the composition root of the subsystem.
//!
//! Owns the persisted registry, the timer scheduler, the notifier, the
//! settings store and the delivered-notification inbox, and keeps the two
//! sources of truth (persisted records vs. in-memory timers) in sync:
//!
//! - scheduling writes the record *and* arms the timer,
//! - firing delivers, records to the inbox and marks the record `fired`,
//! - cancelling disarms the timer *and* removes the record,
//! - [`ReminderService::rearm_pending`] re-arms timers for records that
//!   survived a restart.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::delivery::{ActiveNotification, Notifier, NotificationBackend, ShowOptions};
use crate::models::{
    self, NewScheduledNotification, NotificationKind, NotificationStatus, Permission,
    ReminderTiming, RouteInfo, ScheduledNotification,
};
use crate::scheduler::{DeliverySink, NotificationRequest, TimerScheduler};
use crate::store::{
    KeyValueStore, NewReceivedNotification, NotificationSettings, PermissionStatus,
    ReceivedNotificationStore, ReceivedSource, ScheduledNotificationStore, SettingsStore,
};

use super::cleanup::{self, CleanupReport};
use super::config::ReminderConfig;

/// Version tag written into exported state documents.
pub const EXPORT_VERSION: &str = "1.0";

/// Errors surfaced by the scheduling flow. Everything else in the subsystem
/// degrades via return values; these two are the caller's explicit refusals.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("departure time {0} is already in the past")]
    DepartureInPast(chrono::DateTime<Utc>),

    #[error("lead time {0} minutes is outside the allowed range (0-1440)")]
    InvalidLeadTime(u32),
}

/// Receipt for a scheduled departure reminder.
#[derive(Debug, Clone)]
pub struct ScheduledReminder {
    /// The persisted registry record.
    pub notification: ScheduledNotification,
    /// Timing verdict, including the immediate-fallback flag.
    pub timing: ReminderTiming,
}

/// Full notification state for export/import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedState {
    pub settings: NotificationSettings,
    pub scheduled: Vec<ScheduledNotification>,
    pub permission: PermissionStatus,
    pub exported_at: chrono::DateTime<Utc>,
    pub version: String,
}

/// Composition root for the reminder subsystem.
pub struct ReminderService {
    registry: Arc<ScheduledNotificationStore>,
    scheduler: Arc<TimerScheduler>,
    notifier: Notifier,
    settings: Arc<SettingsStore>,
    inbox: Arc<ReceivedNotificationStore>,
    inbox_retention_days: i64,
}

impl ReminderService {
    /// Build a service with default limits over the given storage and
    /// delivery backend.
    pub fn new(store: Arc<dyn KeyValueStore>, backend: Arc<dyn NotificationBackend>) -> Arc<Self> {
        Self::with_config(store, backend, &ReminderConfig::default())
    }

    /// Build a service applying the inbox limits from `config`.
    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        backend: Arc<dyn NotificationBackend>,
        config: &ReminderConfig,
    ) -> Arc<Self> {
        let registry = Arc::new(ScheduledNotificationStore::new(Arc::clone(&store)));
        let settings = Arc::new(SettingsStore::new(Arc::clone(&store)));
        let inbox = Arc::new(ReceivedNotificationStore::with_max_entries(
            store,
            config.inbox_max_entries,
        ));
        let notifier = Notifier::new(backend);

        // Firing a timer means: deliver, record to the inbox when the
        // platform actually showed it, and mark the registry record fired.
        let sink_notifier = notifier.clone();
        let sink_inbox = Arc::clone(&inbox);
        let sink_registry = Arc::clone(&registry);
        let sink: DeliverySink = Arc::new(move |id, request| {
            let NotificationRequest { title, options } = request;
            let body = options.body.clone().unwrap_or_default();
            let data = options.data.clone();
            let delivered = sink_notifier.show(&title, options).is_some();

            if delivered {
                sink_inbox.record(NewReceivedNotification {
                    title,
                    body,
                    data,
                    source: ReceivedSource::Scheduled,
                });
            }
            sink_registry.update_status(id, NotificationStatus::Fired);
        });

        Arc::new(Self {
            registry,
            scheduler: Arc::new(TimerScheduler::new(sink)),
            notifier,
            settings,
            inbox,
            inbox_retention_days: config.inbox_retention_days,
        })
    }

    pub fn registry(&self) -> &ScheduledNotificationStore {
        &self.registry
    }

    pub fn scheduler(&self) -> &TimerScheduler {
        &self.scheduler
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn inbox(&self) -> &ReceivedNotificationStore {
        &self.inbox
    }

    /// Schedule a departure reminder `minutes_before` minutes ahead of the
    /// route's departure time.
    ///
    /// Refuses a past departure and an out-of-range lead time. When the
    /// regular fire time has already passed (but the departure has not), the
    /// reminder fires after the near-immediate fallback delay instead.
    ///
    /// Scheduling succeeds regardless of permission state: delivery will
    /// no-op at fire time without a granted permission, so callers that want
    /// to avoid silent reminders check [`Self::permission`] first.
    pub fn schedule_departure_reminder(
        &self,
        route: &RouteInfo,
        minutes_before: u32,
    ) -> Result<ScheduledReminder, ReminderError> {
        if minutes_before > models::MAX_LEAD_MINUTES {
            return Err(ReminderError::InvalidLeadTime(minutes_before));
        }

        let timing = models::calculate(route.departure_time, minutes_before);
        let Some(fire_at) = timing.notification_time else {
            return Err(ReminderError::DepartureInPast(route.departure_time));
        };

        if self.notifier.permission() != Permission::Granted {
            log::warn!(
                "scheduling departure reminder without granted permission; delivery will no-op"
            );
        }

        let preset = NotificationKind::Departure.preset();
        let title = format!("{} {}", preset.icon, preset.title);
        let origin = route.origin.as_deref().unwrap_or("your origin");
        let destination = route.destination.as_deref().unwrap_or("your destination");
        let body =
            format!("Leaving {origin} for {destination} in {minutes_before} minutes");

        let id = match &route.route_id {
            Some(route_id) => format!("departure_{route_id}"),
            None => format!("departure_{}", Utc::now().timestamp_millis()),
        };
        let tag = match &route.route_id {
            Some(route_id) => format!("departure-{route_id}"),
            None => preset.tag.to_string(),
        };

        let notification = self.registry.save(NewScheduledNotification {
            id: Some(id),
            title: title.clone(),
            body: body.clone(),
            scheduled_time: fire_at,
            kind: NotificationKind::Departure,
            route_id: route.route_id.clone(),
            plan_id: route.plan_id.clone(),
        });

        self.scheduler.schedule(
            NotificationRequest {
                title,
                options: ShowOptions {
                    body: Some(body),
                    icon: Some(preset.icon.to_string()),
                    tag: Some(tag),
                    require_interaction: preset.require_interaction,
                    data: serde_json::json!({
                        "kind": NotificationKind::Departure,
                        "route_id": route.route_id,
                        "plan_id": route.plan_id,
                    }),
                    ..Default::default()
                },
            },
            timing.delay,
            &notification.id,
        );

        Ok(ScheduledReminder {
            notification,
            timing,
        })
    }

    /// Disarm and forget a reminder. Returns whether anything existed under
    /// the id (a timer, a record, or both).
    pub fn cancel_reminder(&self, id: &str) -> bool {
        let timer_cancelled = self.scheduler.cancel(id);
        let record_removed = self.registry.remove(id);
        timer_cancelled || record_removed
    }

    /// Startup reconciliation: arm a timer for every persisted record that is
    /// still `scheduled` with a future fire time. Past-due records are left
    /// for the expiry pass. Returns the number re-armed.
    pub fn rearm_pending(&self) -> usize {
        let now = Utc::now();
        let mut rearmed = 0;

        for record in self.registry.list(None) {
            if record.status != NotificationStatus::Scheduled || record.scheduled_time <= now {
                continue;
            }

            let preset = record.kind.preset();
            let delay = (record.scheduled_time - now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            self.scheduler.schedule(
                NotificationRequest {
                    title: record.title.clone(),
                    options: ShowOptions {
                        body: Some(record.body.clone()),
                        icon: Some(preset.icon.to_string()),
                        tag: Some(preset.tag.to_string()),
                        require_interaction: preset.require_interaction,
                        data: serde_json::json!({
                            "kind": record.kind,
                            "route_id": record.route_id,
                            "plan_id": record.plan_id,
                        }),
                        ..Default::default()
                    },
                },
                delay,
                &record.id,
            );
            rearmed += 1;
        }

        if rearmed > 0 {
            log::info!("re-armed {rearmed} persisted notification timers");
        }
        rearmed
    }

    /// Collapse duplicate records for one plan (or all of them).
    pub fn cleanup_duplicates(&self, plan_id: Option<&str>) -> usize {
        cleanup::cleanup_duplicates(&self.registry, &self.scheduler, plan_id)
    }

    /// Prune records whose fire time has passed.
    pub fn cleanup_expired(&self, plan_id: Option<&str>) -> usize {
        cleanup::cleanup_expired(&self.registry, &self.scheduler, plan_id)
    }

    /// Both cleanup passes.
    pub fn cleanup_all(&self, plan_id: Option<&str>) -> CleanupReport {
        cleanup::cleanup_all(&self.registry, &self.scheduler, plan_id)
    }

    /// Spawn the periodic maintenance task: registry cleanup plus inbox
    /// age-out, every `period`.
    pub fn spawn_cleanup_loop(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        let service = self;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let report = service.cleanup_all(None);
                let aged_out = service.inbox.cleanup_old(service.inbox_retention_days);
                if report.total() > 0 || aged_out > 0 {
                    log::debug!(
                        "cleanup pass removed {} registry records, {} inbox entries",
                        report.total(),
                        aged_out
                    );
                }
            }
        })
    }

    /// Current delivery permission. Never prompts.
    pub fn permission(&self) -> Permission {
        self.notifier.permission()
    }

    /// Prompt for delivery permission and persist the outcome.
    pub async fn request_permission(&self) -> Permission {
        let permission = self.notifier.request_permission().await;
        self.settings.save_permission_status(permission);
        permission
    }

    /// Deliver a short-lived test notification (settings-screen support).
    pub fn show_test_notification(&self) -> Option<ActiveNotification> {
        self.notifier.show_test_notification()
    }

    /// Snapshot settings, scheduled records and permission status into one
    /// portable document.
    pub fn export_state(&self) -> ExportedState {
        ExportedState {
            settings: self.settings.global(),
            scheduled: self.registry.list(None),
            permission: self.settings.permission_status(),
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Restore a previously exported document. Imported records are persisted
    /// as-is; call [`Self::rearm_pending`] afterwards to arm their timers.
    pub fn import_state(&self, state: ExportedState) -> bool {
        let settings_ok = self.settings.save_global(state.settings);
        let scheduled_ok = self.registry.replace_all(state.scheduled);
        let permission_ok = self.settings.save_permission_status(state.permission.status);
        settings_ok && scheduled_ok && permission_ok
    }
}

#[cfg(test)]
#[path = "reminders_tests.rs"]
mod reminders_tests;
