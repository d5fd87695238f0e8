pub mod local_blob_store;

pub use local_blob_store::{BlobStoreConfig, LocalBlobStore};
