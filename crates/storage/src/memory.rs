//! In-memory object store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ong_core::storage::{validate_key, ObjectStore, StorageError, StoredObject};

use crate::join_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Keeps objects in a map. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    public_base_url: String,
    objects: Mutex<HashMap<String, MemoryObject>>,
}

impl MemoryStore {
    pub fn new(public_base_url: String) -> Self {
        Self {
            public_base_url,
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a stored object by key.
    pub fn get(&self, key: &str) -> Option<MemoryObject> {
        self.lock().get(key).cloned()
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, MemoryObject>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_key(key)?;
        self.lock().insert(
            key.to_string(),
            MemoryObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.lock().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }
}
