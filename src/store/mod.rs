//! Durable storage for the notification subsystem.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services/) - reminder flow, cleanup     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Registry / Settings / Inbox stores                     │
//! │  - whole-collection read-modify-write                   │
//! │  - change-listener broadcast                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  KeyValueStore trait (kv.rs)                            │
//! │  - FileStore (durable)  /  MemoryStore (tests)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures never escape this module as errors: reads fall back to
//! defaults, writes degrade to a logged warning and a `false` return. The
//! guarded read/write helpers live in [`kv`].

pub mod backends;
pub mod error;
pub mod inbox;
pub mod kv;
pub mod listeners;
pub mod registry;
pub mod settings;

pub use backends::{FileStore, MemoryStore};
pub use error::{StoreError, StoreResult};
pub use inbox::{
    NewReceivedNotification, ReceivedNotification, ReceivedNotificationStore, ReceivedSource,
    DEFAULT_RETENTION_DAYS, MAX_RECEIVED,
};
pub use kv::{keys, KeyValueStore};
pub use listeners::{ChangeListeners, Subscription};
pub use registry::ScheduledNotificationStore;
pub use settings::{NotificationSettings, PermissionStatus, SettingsPatch, SettingsStore};
