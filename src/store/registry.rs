//! Persisted registry of scheduled notifications.
//!
//! The whole collection lives as one JSON document under
//! [`keys::SCHEDULED`](crate::store::kv::keys::SCHEDULED). Every mutation is a
//! read-modify-write of the full document, serialised by an internal lock.
//! The store assumes a single process; there is no cross-process
//! coordination.
//!
//! Every mutating operation fires the change broadcast so UI observers can
//! re-poll the collection.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::models::{NewScheduledNotification, NotificationStatus, ScheduledNotification};

use super::kv::{self, keys, KeyValueStore};
use super::listeners::{ChangeListeners, Subscription};

/// Durable registry of [`ScheduledNotification`] records.
pub struct ScheduledNotificationStore {
    store: Arc<dyn KeyValueStore>,
    listeners: ChangeListeners,
    write_lock: Mutex<()>,
}

impl ScheduledNotificationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            listeners: ChangeListeners::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Upsert a record by id: any existing record under the same id is
    /// dropped, the new record is appended and the collection persisted.
    ///
    /// Fills in identity (`notification_<unix-millis>` when the caller did
    /// not provide one), `Scheduled` status and `created_at`. Returns the
    /// persisted record; persistence itself is best-effort (a storage
    /// failure is logged by the write path).
    pub fn save(&self, new: NewScheduledNotification) -> ScheduledNotification {
        let record = ScheduledNotification {
            id: new
                .id
                .unwrap_or_else(|| format!("notification_{}", Utc::now().timestamp_millis())),
            title: new.title,
            body: new.body,
            scheduled_time: new.scheduled_time,
            kind: new.kind,
            route_id: new.route_id,
            plan_id: new.plan_id,
            status: NotificationStatus::Scheduled,
            created_at: Utc::now(),
            updated_at: None,
        };

        {
            let _guard = self.write_lock.lock();
            let mut all = self.load();
            all.retain(|n| n.id != record.id);
            all.push(record.clone());
            self.persist(&all);
        }

        self.listeners.notify();
        record
    }

    /// All records, optionally filtered to one owning plan.
    pub fn list(&self, plan_id: Option<&str>) -> Vec<ScheduledNotification> {
        let all = self.load();
        match plan_id {
            Some(plan) => all
                .into_iter()
                .filter(|n| n.plan_id.as_deref() == Some(plan))
                .collect(),
            None => all,
        }
    }

    /// Look up a single record by id.
    pub fn get(&self, id: &str) -> Option<ScheduledNotification> {
        self.load().into_iter().find(|n| n.id == id)
    }

    /// Patch `status` (and `updated_at`) on the matching record. Returns
    /// whether a record with that id existed.
    pub fn update_status(&self, id: &str, status: NotificationStatus) -> bool {
        let found;
        {
            let _guard = self.write_lock.lock();
            let mut all = self.load();
            let mut matched = false;
            for record in &mut all {
                if record.id == id {
                    record.status = status;
                    record.updated_at = Some(Utc::now());
                    matched = true;
                }
            }
            found = matched;
            if found {
                self.persist(&all);
            }
        }

        self.listeners.notify();
        found
    }

    /// Remove the matching record. Returns whether one existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed;
        {
            let _guard = self.write_lock.lock();
            let mut all = self.load();
            let before = all.len();
            all.retain(|n| n.id != id);
            removed = all.len() != before;
            if removed {
                self.persist(&all);
            }
        }

        self.listeners.notify();
        removed
    }

    /// Replace the whole collection (used by settings import). Returns
    /// whether the write succeeded.
    pub fn replace_all(&self, records: Vec<ScheduledNotification>) -> bool {
        let ok = {
            let _guard = self.write_lock.lock();
            self.persist(&records)
        };
        self.listeners.notify();
        ok
    }

    /// Register an observer invoked after every mutating operation.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    fn load(&self) -> Vec<ScheduledNotification> {
        kv::get_or(self.store.as_ref(), keys::SCHEDULED, Vec::new())
    }

    fn persist(&self, records: &[ScheduledNotification]) -> bool {
        kv::set(self.store.as_ref(), keys::SCHEDULED, &records)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
