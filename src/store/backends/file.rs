//! Durable file-backed key-value store.
//!
//! Each logical key is persisted as `<key>.json` inside the store directory.
//! Writes go through a sibling temp file and a rename so a crash mid-write
//! never leaves a half-written document behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::store::error::StoreResult;
use crate::store::kv::KeyValueStore;

/// File-per-key [`KeyValueStore`] implementation.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory this store persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!(
                "trip-reminders-filestore-{}-{}",
                std::process::id(),
                DIR_SEQ.fetch_add(1, Ordering::Relaxed)
            ));
            TempDir(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_open_creates_directory() {
        let tmp = TempDir::new();
        let store = FileStore::open(&tmp.0).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_write_read_roundtrip() {
        let tmp = TempDir::new();
        let store = FileStore::open(&tmp.0).unwrap();
        store.write("scheduled_notifications", "[1,2]").unwrap();
        assert_eq!(
            store.read("scheduled_notifications").unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[test]
    fn test_read_missing_key_is_none() {
        let tmp = TempDir::new();
        let store = FileStore::open(&tmp.0).unwrap();
        assert_eq!(store.read("absent").unwrap(), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = TempDir::new();
        let store = FileStore::open(&tmp.0).unwrap();
        store.write("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let tmp = TempDir::new();
        {
            let store = FileStore::open(&tmp.0).unwrap();
            store.write("k", "persisted").unwrap();
        }
        let reopened = FileStore::open(&tmp.0).unwrap();
        assert_eq!(reopened.read("k").unwrap().as_deref(), Some("persisted"));
    }
}
