use serde::{Deserialize, Serialize};

/// Coordinates of an artifact in the blob store. Only present for documents
/// that were uploaded as files; text-created documents carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLocation {
    pub bucket: String,
    pub object_name: String,
    pub url: String,
}

impl BlobLocation {
    pub fn new(bucket: String, object_name: String, url: String) -> Self {
        Self {
            bucket,
            object_name,
            url,
        }
    }
}
