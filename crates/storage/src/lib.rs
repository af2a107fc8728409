//! Object storage backends for uploaded images and payment proofs.
//!
//! Every backend implements [`ObjectStore`]; the API picks one at startup
//! from [`StorageBackend`].

use std::path::PathBuf;
use std::sync::Arc;

use ong_core::storage::{ObjectStore, StorageError};

pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

/// Which backend to build, with its settings.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Files under `root`, served at `public_base_url`.
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    /// An S3 bucket. Credentials and region come from the AWS environment.
    S3 {
        bucket: String,
        public_base_url: Option<String>,
    },
    /// Process memory. Contents are lost on restart.
    Memory { public_base_url: String },
}

/// Build the configured backend.
pub async fn build_store(backend: &StorageBackend) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let store: Arc<dyn ObjectStore> = match backend {
        StorageBackend::Local {
            root,
            public_base_url,
        } => Arc::new(LocalStore::new(root.clone(), public_base_url.clone()).await?),
        StorageBackend::S3 {
            bucket,
            public_base_url,
        } => Arc::new(S3Store::from_env(bucket.clone(), public_base_url.clone()).await),
        StorageBackend::Memory { public_base_url } => {
            Arc::new(MemoryStore::new(public_base_url.clone()))
        }
    };
    Ok(store)
}

/// Join a base URL and a key with exactly one slash.
pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}
