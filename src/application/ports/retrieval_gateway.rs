use async_trait::async_trait;

#[derive(Debug)]
pub enum RetrievalGatewayError {
    NetworkError(String),
    ApiError(String),
    InvalidInput(String),
}

impl std::fmt::Display for RetrievalGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalGatewayError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            RetrievalGatewayError::ApiError(msg) => write!(f, "API error: {}", msg),
            RetrievalGatewayError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for RetrievalGatewayError {}

/// How the backend scores a search. A fixed parameter set, not a tunable
/// ranking algorithm of our own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchMode {
    Semantic,
    Hybrid { keyword_weight: f64 },
}

/// A retrieved fragment of indexed content plus its originating document
/// reference, when the backend can resolve one.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub content: String,
    pub source_doc_id: Option<String>,
    pub source_doc_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub external_doc_id: String,
}

#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    async fn create_collection(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<String, RetrievalGatewayError>;

    async fn delete_collection(&self, collection_id: &str) -> Result<(), RetrievalGatewayError>;

    async fn index_text(
        &self,
        collection_id: &str,
        name: &str,
        text: &str,
    ) -> Result<IndexedDocument, RetrievalGatewayError>;

    async fn index_file(
        &self,
        collection_id: &str,
        file_bytes: Vec<u8>,
        filename: &str,
    ) -> Result<IndexedDocument, RetrievalGatewayError>;

    async fn delete_document(
        &self,
        collection_id: &str,
        external_doc_id: &str,
    ) -> Result<(), RetrievalGatewayError>;

    /// Ranked passages, best first. Ordering is the backend's; callers must
    /// not re-rank.
    async fn search(
        &self,
        collection_id: &str,
        query: &str,
        top_k: i32,
        mode: SearchMode,
    ) -> Result<Vec<Passage>, RetrievalGatewayError>;
}
