//! Error types for the key-value storage boundary.

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by a [`crate::store::KeyValueStore`] backend.
///
/// These never cross the registry boundary: registry reads fall back to the
/// caller-supplied default and registry writes degrade to a logged warning
/// plus a `false` return.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying medium failed (disk full, permissions, missing directory).
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure that is neither i/o nor serialization.
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error from a plain message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
