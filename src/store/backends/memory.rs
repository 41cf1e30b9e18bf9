//! In-memory key-value store for unit testing and local development.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::store::error::{StoreError, StoreResult};
use crate::store::kv::KeyValueStore;

/// In-memory [`KeyValueStore`] implementation.
///
/// `failing()` constructs a variant whose writes always fail, used to test
/// the guarded-write policy of the layers above.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, emulating quota/privacy-mode errors.
    pub fn failing() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fail_writes: true,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::backend("writes disabled"));
        }
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::backend("writes disabled"));
        }
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_remove() {
        let store = MemoryStore::new();
        store.write("a", "1").unwrap();
        assert_eq!(store.read("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert_eq!(store.read("a").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn test_failing_store_rejects_writes_but_reads() {
        let store = MemoryStore::failing();
        assert!(store.write("a", "1").is_err());
        assert_eq!(store.read("a").unwrap(), None);
    }
}
