use async_trait::async_trait;
use chrono::Utc;
use std::env;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::blob_store::{BlobStore, BlobStoreError, StoredBlob};

#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    pub root_dir: PathBuf,
    pub bucket: String,
    pub public_base_url: String,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        let root_dir = env::var("BLOB_ROOT_DIR").unwrap_or_else(|_| "./blobs".to_string());
        let bucket = env::var("BLOB_BUCKET").unwrap_or_else(|_| "kb-files".to_string());
        let public_base_url =
            env::var("BLOB_PUBLIC_URL").unwrap_or_else(|_| "http://localhost:3000/blobs".to_string());

        Self {
            root_dir: PathBuf::from(root_dir),
            bucket,
            public_base_url,
        }
    }
}

/// Filesystem-backed object store. Object names are prefixed with a fresh
/// uuid so repeated uploads of the same file never collide.
pub struct LocalBlobStore {
    config: BlobStoreConfig,
}

impl LocalBlobStore {
    pub fn new(config: BlobStoreConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(BlobStoreConfig::default())
    }

    async fn ensure_directory_exists(&self) -> Result<(), BlobStoreError> {
        fs::create_dir_all(&self.config.root_dir)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))
    }

    fn object_path(&self, object_name: &str) -> Result<PathBuf, BlobStoreError> {
        if object_name.is_empty() || object_name.contains("..") || object_name.contains('/') {
            return Err(BlobStoreError::InvalidName(object_name.to_string()));
        }
        Ok(self.config.root_dir.join(object_name))
    }

    fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            object_name
        )
    }

    fn sanitize(file_name: &str) -> String {
        file_name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        data: &[u8],
        file_name: &str,
        _content_type: Option<&str>,
    ) -> Result<StoredBlob, BlobStoreError> {
        self.ensure_directory_exists().await?;

        let object_name = format!("{}_{}", Uuid::new_v4(), Self::sanitize(file_name));
        let path = self.object_path(&object_name)?;

        fs::write(&path, data)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

        Ok(StoredBlob {
            bucket: self.config.bucket.clone(),
            url: self.public_url(&object_name),
            object_name,
        })
    }

    async fn get(&self, object_name: &str) -> Result<Vec<u8>, BlobStoreError> {
        let path = self.object_path(object_name)?;

        if !path.exists() {
            return Err(BlobStoreError::NotFound(object_name.to_string()));
        }

        fs::read(&path)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))
    }

    async fn presigned_url(
        &self,
        object_name: &str,
        ttl_secs: u64,
    ) -> Result<String, BlobStoreError> {
        let path = self.object_path(object_name)?;

        if !path.exists() {
            return Err(BlobStoreError::NotFound(object_name.to_string()));
        }

        let expires_at = Utc::now().timestamp() + ttl_secs as i64;
        Ok(format!(
            "{}?expires={}",
            self.public_url(object_name),
            expires_at
        ))
    }

    async fn delete(&self, _bucket: &str, object_name: &str) -> Result<bool, BlobStoreError> {
        let path = self.object_path(object_name)?;

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

        Ok(true)
    }
}
