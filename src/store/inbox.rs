//! Delivered-notification inbox.
//!
//! Every notification that actually reaches the user is appended here so a
//! notification-center panel can render history and an unread badge. The
//! collection is capped and aged out, newest first.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::kv::{self, keys, KeyValueStore};
use super::listeners::{ChangeListeners, Subscription};

/// Default cap on stored inbox entries.
pub const MAX_RECEIVED: usize = 100;

/// Default age-out horizon for [`ReceivedNotificationStore::cleanup_old`].
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Where a delivered notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivedSource {
    /// Pushed from a remote service.
    Push,
    /// Emitted by the application itself (test notifications, status).
    System,
    /// Fired by the local reminder scheduler.
    Scheduled,
}

/// One delivered notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedNotification {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Opaque payload carried through from delivery, for click routing.
    #[serde(default)]
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub source: ReceivedSource,
}

/// Input for [`ReceivedNotificationStore::record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReceivedNotification {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: serde_json::Value,
    pub source: ReceivedSource,
}

/// Capped, durable inbox of delivered notifications.
pub struct ReceivedNotificationStore {
    store: Arc<dyn KeyValueStore>,
    listeners: ChangeListeners,
    write_lock: Mutex<()>,
    next_seq: AtomicU64,
    max_entries: usize,
}

impl ReceivedNotificationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_max_entries(store, MAX_RECEIVED)
    }

    /// Inbox with a custom entry cap (the oldest entries are dropped first).
    pub fn with_max_entries(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self {
            store,
            listeners: ChangeListeners::new(),
            write_lock: Mutex::new(()),
            next_seq: AtomicU64::new(0),
            max_entries,
        }
    }

    /// Append a delivered notification, enforcing the entry cap. Returns the
    /// stored record.
    pub fn record(&self, new: NewReceivedNotification) -> ReceivedNotification {
        let record = ReceivedNotification {
            id: format!(
                "recv_{}_{}",
                Utc::now().timestamp_millis(),
                self.next_seq.fetch_add(1, Ordering::Relaxed)
            ),
            title: new.title,
            body: new.body,
            data: new.data,
            timestamp: Utc::now(),
            is_read: false,
            source: new.source,
        };

        {
            let _guard = self.write_lock.lock();
            let mut all = self.load();
            all.insert(0, record.clone());
            all.truncate(self.max_entries);
            self.persist(&all);
        }

        self.listeners.notify();
        record
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<ReceivedNotification> {
        let mut all = self.load();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all
    }

    /// Mark one entry read. Returns whether it existed.
    pub fn mark_read(&self, id: &str) -> bool {
        let found;
        {
            let _guard = self.write_lock.lock();
            let mut all = self.load();
            found = match all.iter_mut().find(|n| n.id == id) {
                Some(entry) => {
                    entry.is_read = true;
                    true
                }
                None => false,
            };
            if found {
                self.persist(&all);
            }
        }

        self.listeners.notify();
        found
    }

    /// Mark every entry read. Returns whether the write succeeded.
    pub fn mark_all_read(&self) -> bool {
        let ok;
        {
            let _guard = self.write_lock.lock();
            let mut all = self.load();
            for entry in &mut all {
                entry.is_read = true;
            }
            ok = self.persist(&all);
        }

        self.listeners.notify();
        ok
    }

    /// Delete one entry. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
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

    /// Remove every entry.
    pub fn clear(&self) -> bool {
        let ok = {
            let _guard = self.write_lock.lock();
            kv::clear(self.store.as_ref(), keys::RECEIVED)
        };
        self.listeners.notify();
        ok
    }

    /// Count of unread entries.
    pub fn unread_count(&self) -> usize {
        self.load().iter().filter(|n| !n.is_read).count()
    }

    /// Drop entries older than `days`. Returns the number removed.
    pub fn cleanup_old(&self, days: i64) -> usize {
        let horizon = Utc::now() - ChronoDuration::days(days);
        let removed;
        {
            let _guard = self.write_lock.lock();
            let mut all = self.load();
            let before = all.len();
            all.retain(|n| n.timestamp > horizon);
            removed = before - all.len();
            if removed > 0 {
                self.persist(&all);
            }
        }

        if removed > 0 {
            self.listeners.notify();
        }
        removed
    }

    /// [`Self::cleanup_old`] with the default 30-day horizon.
    pub fn cleanup_old_default(&self) -> usize {
        self.cleanup_old(DEFAULT_RETENTION_DAYS)
    }

    /// Register an observer invoked after every mutating operation.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    fn load(&self) -> Vec<ReceivedNotification> {
        kv::get_or(self.store.as_ref(), keys::RECEIVED, Vec::new())
    }

    fn persist(&self, records: &[ReceivedNotification]) -> bool {
        kv::set(self.store.as_ref(), keys::RECEIVED, &records)
    }
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod inbox_tests;
