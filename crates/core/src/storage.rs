//! Object storage abstraction for uploaded images and payment proofs.
//!
//! Backends live in the `ong-storage` crate. Handlers only see
//! `Arc<dyn ObjectStore>`, so tests can swap in an in-memory store.

use async_trait::async_trait;

/// Errors raised by object storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Key inside the bucket/root (what gets persisted as `*_path`).
    pub key: String,
    /// Public URL clients use to fetch the object.
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Delete the object at `key`. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL for `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Reject keys that could escape the storage root.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
