pub mod blob_store;
pub mod generation_gateway;
pub mod retrieval_gateway;

pub use blob_store::BlobStore;
pub use generation_gateway::GenerationGateway;
pub use retrieval_gateway::RetrievalGateway;
