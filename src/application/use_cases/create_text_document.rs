use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{IngestionError, IngestionService};

#[derive(Debug)]
pub enum CreateTextDocumentError {
    KnowledgeBaseNotFound(Uuid),
    EmptyContent,
    IndexingFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for CreateTextDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateTextDocumentError::KnowledgeBaseNotFound(id) => {
                write!(f, "Knowledge base not found: {}", id)
            }
            CreateTextDocumentError::EmptyContent => write!(f, "Text content must not be empty"),
            CreateTextDocumentError::IndexingFailed(msg) => write!(f, "Indexing failed: {}", msg),
            CreateTextDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for CreateTextDocumentError {}

impl From<IngestionError> for CreateTextDocumentError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::KnowledgeBaseNotFound(id) | IngestionError::CollectionMissing(id) => {
                CreateTextDocumentError::KnowledgeBaseNotFound(id)
            }
            IngestionError::ProcessingFailed(msg) => CreateTextDocumentError::IndexingFailed(msg),
            other => CreateTextDocumentError::RepositoryError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTextDocumentRequest {
    pub kb_id: Uuid,
    pub name: String,
    pub text: String,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct CreateTextDocumentResponse {
    pub document_id: Uuid,
    pub name: String,
    pub status: String,
}

pub struct CreateTextDocumentUseCase {
    ingestion_service: Arc<IngestionService>,
}

impl CreateTextDocumentUseCase {
    pub fn new(ingestion_service: Arc<IngestionService>) -> Self {
        Self { ingestion_service }
    }

    pub async fn execute(
        &self,
        request: CreateTextDocumentRequest,
    ) -> Result<CreateTextDocumentResponse, CreateTextDocumentError> {
        if request.text.trim().is_empty() {
            return Err(CreateTextDocumentError::EmptyContent);
        }

        let document = self
            .ingestion_service
            .ingest_text(request.kb_id, &request.name, &request.text, request.user_id)
            .await?;

        Ok(CreateTextDocumentResponse {
            document_id: document.id(),
            name: document.file_name().to_string(),
            status: document.status().to_string(),
        })
    }
}
