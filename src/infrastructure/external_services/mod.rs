pub mod generation_client;
pub mod retrieval_client;

pub use generation_client::{GenerationClientConfig, HttpGenerationClient};
pub use retrieval_client::{HttpRetrievalClient, RetrievalClientConfig};
