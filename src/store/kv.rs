//! Key-value storage abstraction.
//!
//! The registry persists each logical collection as one JSON document under a
//! well-known key. The [`KeyValueStore`] trait is the seam that lets the
//! durable file backend and the in-memory test backend be swapped; the
//! [`get_or`]/[`set`] helpers implement the guarded read/write policy: a
//! failed read falls back to the caller's default, a failed write logs a
//! warning and reports `false`. Neither ever panics or propagates an error.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreResult;

/// Well-known logical keys used by the notification subsystem.
pub mod keys {
    /// User notification preferences (global plus per-plan/per-route patches).
    pub const SETTINGS: &str = "travel_notification_settings";
    /// The scheduled-notification collection.
    pub const SCHEDULED: &str = "scheduled_notifications";
    /// Last-known platform permission status.
    pub const PERMISSION: &str = "notification_permission_status";
    /// Delivered-notification inbox.
    pub const RECEIVED: &str = "received_notifications";
}

/// Abstract durable key-value store with JSON-string values.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value under `key`; `Ok(None)` when the key is absent.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write the raw value under `key`, replacing any existing value.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove the value under `key`; absent keys are not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Read and deserialize `key`, falling back to `default` on a missing key,
/// a read failure, or a decode failure.
pub fn get_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("discarding unreadable value under {key}: {e}");
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            log::warn!("storage read failed for {key}: {e}");
            default
        }
    }
}

/// Serialize and write `value` under `key`. Returns whether the write
/// succeeded; failures are logged, never propagated.
pub fn set<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("failed to serialize value for {key}: {e}");
            return false;
        }
    };

    match store.write(key, &raw) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("storage write failed for {key}: {e}");
            false
        }
    }
}

/// Remove `key`, reporting success as a bool in the same guarded style.
pub fn clear(store: &dyn KeyValueStore, key: &str) -> bool {
    match store.remove(key) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("storage remove failed for {key}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backends::MemoryStore;

    #[test]
    fn test_get_or_returns_default_for_missing_key() {
        let store = MemoryStore::new();
        let value: Vec<String> = get_or(&store, "absent", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let store = MemoryStore::new();
        assert!(set(&store, "numbers", &vec![1, 2, 3]));
        let value: Vec<i32> = get_or(&store, "numbers", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_get_or_recovers_from_corrupt_value() {
        let store = MemoryStore::new();
        store.write("corrupt", "{not json").unwrap();
        let value: Vec<i32> = get_or(&store, "corrupt", vec![9]);
        assert_eq!(value, vec![9]);
    }

    #[test]
    fn test_set_reports_failure_from_failing_store() {
        let store = MemoryStore::failing();
        assert!(!set(&store, "k", &1));
        let value: i32 = get_or(&store, "k", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_clear_removes_key() {
        let store = MemoryStore::new();
        assert!(set(&store, "k", &1));
        assert!(clear(&store, "k"));
        assert_eq!(store.read("k").unwrap(), None);
    }
}
