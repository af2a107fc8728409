//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use ong_core::storage::{validate_key, ObjectStore, StorageError, StoredObject};

use crate::join_url;

/// Stores objects in a single S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Store {
    /// Build a client from the standard AWS environment (region, credentials).
    ///
    /// Without an explicit `public_base_url`, objects are addressed through
    /// the bucket's virtual-hosted endpoint.
    pub async fn from_env(bucket: String, public_base_url: Option<String>) -> Self {
        let config = aws_config::load_from_env().await;
        let client = Client::new(&config);
        let public_base_url =
            public_base_url.unwrap_or_else(|| format!("https://{bucket}.s3.amazonaws.com"));
        tracing::info!(%bucket, "Using S3 object storage");
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_key(key)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }
}
