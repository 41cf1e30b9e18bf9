//! Change-listener broadcast used by the registry and the inbox.
//!
//! Observers register a callback that is invoked (with no arguments) after
//! every mutating operation. A panicking listener is caught and logged so it
//! can never break the mutating caller or the other listeners.

use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(u64, Listener)>>,
}

/// A set of change listeners with isolated dispatch.
///
/// Clones share the same listener set, so the owning store can hand the
/// broadcast to whoever needs to fire it.
#[derive(Clone)]
pub struct ChangeListeners {
    inner: Arc<Inner>,
}

impl ChangeListeners {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(0),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Register a listener. Keep the returned [`Subscription`] and call
    /// `unsubscribe` to deregister; dropping it without unsubscribing leaves
    /// the listener installed.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .push((id, Arc::new(listener)));
        Subscription {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Invoke every registered listener, isolating panics per listener.
    pub fn notify(&self) {
        // Snapshot outside the lock so a listener may subscribe/unsubscribe
        // without deadlocking.
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                log::warn!("notification change listener panicked; continuing");
            }
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChangeListeners {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for deregistering a listener.
pub struct Subscription {
    id: u64,
    inner: Arc<Inner>,
}

impl Subscription {
    /// Remove the listener this subscription refers to.
    pub fn unsubscribe(self) {
        self.inner
            .listeners
            .write()
            .retain(|(id, _)| *id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_invokes_every_listener() {
        let listeners = ChangeListeners::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&count);
        let _s1 = listeners.subscribe(move || {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&count);
        let _s2 = listeners.subscribe(move || {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        listeners.notify();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_listener_does_not_block_others() {
        let listeners = ChangeListeners::new();
        let reached = Arc::new(AtomicUsize::new(0));

        let _s1 = listeners.subscribe(|| panic!("listener failure"));
        let r = Arc::clone(&reached);
        let _s2 = listeners.subscribe(move || {
            r.fetch_add(1, Ordering::SeqCst);
        });

        // Must not propagate the panic.
        listeners.notify();
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_removes_listener() {
        let listeners = ChangeListeners::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let sub = listeners.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(listeners.len(), 1);

        sub.unsubscribe();
        assert!(listeners.is_empty());

        listeners.notify();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_another_during_notify() {
        let listeners = ChangeListeners::new();
        let inner = listeners.clone();
        let victim = listeners.subscribe(|| {});
        let victim = parking_lot::Mutex::new(Some(victim));

        let _s = listeners.subscribe(move || {
            if let Some(sub) = victim.lock().take() {
                sub.unsubscribe();
            }
        });

        listeners.notify();
        assert_eq!(inner.len(), 1);
    }
}
