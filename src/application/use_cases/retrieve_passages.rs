use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::retrieval_gateway::Passage;
use crate::application::services::rag_service::DEFAULT_TOP_K;
use crate::application::services::{RagError, RagService};

#[derive(Debug)]
pub enum RetrievePassagesError {
    KnowledgeBaseNotFound(Uuid),
    RetrievalFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for RetrievePassagesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievePassagesError::KnowledgeBaseNotFound(id) => {
                write!(f, "Knowledge base not found: {}", id)
            }
            RetrievePassagesError::RetrievalFailed(msg) => write!(f, "Retrieval failed: {}", msg),
            RetrievePassagesError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RetrievePassagesError {}

impl From<RagError> for RetrievePassagesError {
    fn from(error: RagError) -> Self {
        match error {
            RagError::KnowledgeBaseNotFound(id) | RagError::CollectionMissing(id) => {
                RetrievePassagesError::KnowledgeBaseNotFound(id)
            }
            RagError::RetrievalFailed(msg) => RetrievePassagesError::RetrievalFailed(msg),
            other => RetrievePassagesError::RepositoryError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrievePassagesRequest {
    pub kb_id: Uuid,
    pub query: String,
    pub top_k: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct RetrievePassagesResponse {
    pub passages: Vec<Passage>,
}

/// Raw retrieval without generation, for inspecting what a query pulls
/// back from the index.
pub struct RetrievePassagesUseCase {
    rag_service: Arc<RagService>,
}

impl RetrievePassagesUseCase {
    pub fn new(rag_service: Arc<RagService>) -> Self {
        Self { rag_service }
    }

    pub async fn execute(
        &self,
        request: RetrievePassagesRequest,
    ) -> Result<RetrievePassagesResponse, RetrievePassagesError> {
        let passages = self
            .rag_service
            .retrieve(
                request.kb_id,
                &request.query,
                request.top_k.unwrap_or(DEFAULT_TOP_K),
            )
            .await?;

        Ok(RetrievePassagesResponse { passages })
    }
}
