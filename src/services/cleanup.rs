//! Registry cleanup passes.
//!
//! Both passes operate on the persisted registry *and* the in-memory timer
//! map: a pruned record's timer (if any) is cancelled so nothing fires for a
//! record that no longer exists.

use chrono::Utc;
use std::collections::HashMap;

use crate::models::{NotificationKind, ScheduledNotification};
use crate::scheduler::TimerScheduler;
use crate::store::ScheduledNotificationStore;

/// Outcome of [`cleanup_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub duplicates_removed: usize,
    pub expired_removed: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.duplicates_removed + self.expired_removed
    }
}

/// Collapse duplicate records: within each `(route_id, kind)` group, keep the
/// record with the greatest `created_at` and cancel-and-remove the rest.
/// Returns the number removed.
pub fn cleanup_duplicates(
    registry: &ScheduledNotificationStore,
    scheduler: &TimerScheduler,
    plan_id: Option<&str>,
) -> usize {
    let notifications = registry.list(plan_id);

    let mut groups: HashMap<(Option<String>, NotificationKind), Vec<ScheduledNotification>> =
        HashMap::new();
    for notification in notifications {
        groups
            .entry((notification.route_id.clone(), notification.kind))
            .or_default()
            .push(notification);
    }

    let mut removed = 0;
    for (_, mut group) in groups {
        if group.len() < 2 {
            continue;
        }
        // Newest first; equal timestamps keep their iteration order.
        group.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for stale in &group[1..] {
            scheduler.cancel(&stale.id);
            registry.remove(&stale.id);
            removed += 1;
        }
    }

    if removed > 0 {
        log::debug!("pruned {removed} duplicate notification records");
    }
    removed
}

/// Remove every record whose scheduled time has passed, cancelling any
/// backing timer. Returns the number removed.
///
/// Past-due `scheduled` records are pruned even if they never fired (the
/// process may have been down at fire time); the registry does not
/// distinguish the two cases.
pub fn cleanup_expired(
    registry: &ScheduledNotificationStore,
    scheduler: &TimerScheduler,
    plan_id: Option<&str>,
) -> usize {
    let now = Utc::now();
    let mut removed = 0;

    for notification in registry.list(plan_id) {
        if notification.scheduled_time < now {
            scheduler.cancel(&notification.id);
            registry.remove(&notification.id);
            removed += 1;
        }
    }

    if removed > 0 {
        log::debug!("pruned {removed} expired notification records");
    }
    removed
}

/// Run both passes: duplicates first, then expiry.
pub fn cleanup_all(
    registry: &ScheduledNotificationStore,
    scheduler: &TimerScheduler,
    plan_id: Option<&str>,
) -> CleanupReport {
    CleanupReport {
        duplicates_removed: cleanup_duplicates(registry, scheduler, plan_id),
        expired_removed: cleanup_expired(registry, scheduler, plan_id),
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod cleanup_tests;
