use async_trait::async_trait;

#[derive(Debug)]
pub enum BlobStoreError {
    NotFound(String),
    IoError(String),
    InvalidName(String),
}

impl std::fmt::Display for BlobStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobStoreError::NotFound(name) => write!(f, "Blob not found: {}", name),
            BlobStoreError::IoError(msg) => write!(f, "IO error: {}", msg),
            BlobStoreError::InvalidName(name) => write!(f, "Invalid object name: {}", name),
        }
    }
}

impl std::error::Error for BlobStoreError {}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bucket: String,
    pub object_name: String,
    pub url: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        data: &[u8],
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<StoredBlob, BlobStoreError>;

    async fn get(&self, object_name: &str) -> Result<Vec<u8>, BlobStoreError>;

    /// Time-limited access URL for backends that fetch the artifact
    /// themselves. The expiry window is configuration, not contract.
    async fn presigned_url(
        &self,
        object_name: &str,
        ttl_secs: u64,
    ) -> Result<String, BlobStoreError>;

    async fn delete(&self, bucket: &str, object_name: &str) -> Result<bool, BlobStoreError>;
}
