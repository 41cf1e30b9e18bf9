//! One-shot notification timers.
//!
//! [`TimerScheduler`] owns the in-memory registry of armed timers, keyed by a
//! caller-chosen string id. Re-scheduling under an existing id is defined as
//! cancel-then-rearm, so at most one timer per id is pending at any instant.
//!
//! Timers are memory-resident only: they do not survive a process restart.
//! The persisted registry in [`crate::store`] is the durable side; the
//! service layer's startup reconciliation re-arms timers for records that are
//! still eligible. The two sources of truth meet only in
//! [`crate::services::ReminderService`].

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::delivery::ShowOptions;
use crate::models::NotificationStatus;

/// What a timer delivers when it fires.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub title: String,
    pub options: ShowOptions,
}

/// Sink invoked when a timer elapses, with the timer id and the payload.
/// Installed once at construction; the composition root decides what firing
/// means (deliver, record, mark fired).
pub type DeliverySink = Arc<dyn Fn(&str, NotificationRequest) + Send + Sync>;

/// Receipt for an armed timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub id: String,
    /// Wall-clock instant the timer is expected to fire.
    pub scheduled_time: DateTime<Utc>,
}

/// Introspection entry for a pending timer. This reflects the in-memory
/// timer map only, not the persisted registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTimer {
    pub id: String,
    pub status: NotificationStatus,
}

struct TimerEntry {
    seq: u64,
    handle: tokio::task::JoinHandle<()>,
    scheduled_time: DateTime<Utc>,
}

/// In-memory registry of armed one-shot timers.
///
/// Construct one instance at the application's composition root and share it;
/// `schedule` must be called within a tokio runtime.
pub struct TimerScheduler {
    sink: DeliverySink,
    timers: Arc<RwLock<HashMap<String, TimerEntry>>>,
    next_seq: AtomicU64,
}

impl TimerScheduler {
    pub fn new(sink: DeliverySink) -> Self {
        Self {
            sink,
            timers: Arc::new(RwLock::new(HashMap::new())),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Arm a one-shot timer that hands `request` to the delivery sink after
    /// `delay`. An existing timer under `id` is silently cancelled and
    /// replaced. Delay clamping is the caller's business; whatever is given
    /// is armed as-is.
    pub fn schedule(
        &self,
        request: NotificationRequest,
        delay: Duration,
        id: &str,
    ) -> ScheduledTimer {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let scheduled_time = Utc::now()
            + ChronoDuration::from_std(delay).unwrap_or_else(|_| ChronoDuration::zero());

        // Insert under the same lock that the fire path takes, so a
        // zero-delay timer cannot observe the map before its own entry is in.
        let mut timers = self.timers.write();

        let task_id = id.to_string();
        let task_timers = Arc::clone(&self.timers);
        let sink = Arc::clone(&self.sink);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut map = task_timers.write();
                // Purge our own entry so cancel-after-fire is a no-op. A
                // replacement under the same id carries a newer seq and is
                // left alone.
                if map.get(&task_id).map(|e| e.seq) == Some(seq) {
                    map.remove(&task_id);
                }
            }
            log::debug!("notification timer {task_id} fired");
            sink(&task_id, request);
        });

        if let Some(previous) = timers.insert(
            id.to_string(),
            TimerEntry {
                seq,
                handle,
                scheduled_time,
            },
        ) {
            previous.handle.abort();
            log::debug!("replaced pending notification timer {id}");
        } else {
            log::debug!("armed notification timer {id} in {delay:?}");
        }

        ScheduledTimer {
            id: id.to_string(),
            scheduled_time,
        }
    }

    /// Cancel the pending timer under `id`. Returns whether one existed;
    /// calling again (or after the timer fired) is a no-op returning false.
    pub fn cancel(&self, id: &str) -> bool {
        match self.timers.write().remove(id) {
            Some(entry) => {
                entry.handle.abort();
                log::debug!("cancelled notification timer {id}");
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer. Used for teardown.
    pub fn cancel_all(&self) {
        let drained: Vec<(String, TimerEntry)> = self.timers.write().drain().collect();
        for (id, entry) in drained {
            entry.handle.abort();
            log::debug!("cancelled notification timer {id}");
        }
    }

    /// Pending timers, by id. In-memory state only; callers keep this and
    /// the persisted registry in sync themselves.
    pub fn active(&self) -> Vec<ActiveTimer> {
        self.timers
            .read()
            .keys()
            .map(|id| ActiveTimer {
                id: id.clone(),
                status: NotificationStatus::Scheduled,
            })
            .collect()
    }

    /// Expected fire time of the pending timer under `id`, if any.
    pub fn scheduled_time(&self, id: &str) -> Option<DateTime<Utc>> {
        self.timers.read().get(id).map(|e| e.scheduled_time)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.read().is_empty()
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
