use std::sync::Arc;

use crate::application::services::rag_service::{DEFAULT_TOP_K, KbRef, RagSource};
use crate::application::services::{RagError, RagService};

#[derive(Debug)]
pub enum AskCollectionError {
    EmptyQuery,
    GenerationFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for AskCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskCollectionError::EmptyQuery => write!(f, "Query must not be empty"),
            AskCollectionError::GenerationFailed(msg) => write!(f, "Generation failed: {}", msg),
            AskCollectionError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for AskCollectionError {}

impl From<RagError> for AskCollectionError {
    fn from(error: RagError) -> Self {
        match error {
            RagError::GenerationFailed(msg) | RagError::RetrievalFailed(msg) => {
                AskCollectionError::GenerationFailed(msg)
            }
            other => AskCollectionError::RepositoryError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AskCollectionRequest {
    pub collection_id: String,
    pub query: String,
    pub top_k: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct AskCollectionResponse {
    pub answer: String,
    pub sources: Vec<RagSource>,
    pub retrieval_count: usize,
}

/// Stateless question answering against a raw collection id, bypassing
/// knowledge base records and conversation storage entirely.
pub struct AskCollectionUseCase {
    rag_service: Arc<RagService>,
}

impl AskCollectionUseCase {
    pub fn new(rag_service: Arc<RagService>) -> Self {
        Self { rag_service }
    }

    pub async fn execute(
        &self,
        request: AskCollectionRequest,
    ) -> Result<AskCollectionResponse, AskCollectionError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AskCollectionError::EmptyQuery);
        }

        let rag_answer = self
            .rag_service
            .answer(
                KbRef::Collection(request.collection_id),
                query,
                request.top_k.unwrap_or(DEFAULT_TOP_K),
                &[],
            )
            .await?;

        Ok(AskCollectionResponse {
            answer: rag_answer.answer,
            sources: rag_answer.sources,
            retrieval_count: rag_answer.retrieval_count,
        })
    }
}
