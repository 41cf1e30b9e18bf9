//! Delivery backend implementations.
//!
//! - [`ConsoleBackend`]: renders to the process log, always granted.
//! - [`MemoryBackend`]: records deliveries for unit testing.
//!
//! OS-native surfaces (toast/D-Bus/user-notification centers) plug in behind
//! the same [`NotificationBackend`](super::NotificationBackend) trait.

pub mod console;
pub mod memory;

pub use console::ConsoleBackend;
pub use memory::{MemoryBackend, MemoryNotification};
