use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{IngestionError, IngestionService};

#[derive(Debug)]
pub enum UploadDocumentError {
    KnowledgeBaseNotFound(Uuid),
    EmptyFile(String),
    ProcessingFailed(String),
    StorageError(String),
    RepositoryError(String),
}

impl std::fmt::Display for UploadDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDocumentError::KnowledgeBaseNotFound(id) => {
                write!(f, "Knowledge base not found: {}", id)
            }
            UploadDocumentError::EmptyFile(name) => write!(f, "Empty file: {}", name),
            UploadDocumentError::ProcessingFailed(msg) => write!(f, "Processing failed: {}", msg),
            UploadDocumentError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            UploadDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for UploadDocumentError {}

impl From<IngestionError> for UploadDocumentError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::KnowledgeBaseNotFound(id) | IngestionError::CollectionMissing(id) => {
                UploadDocumentError::KnowledgeBaseNotFound(id)
            }
            IngestionError::ProcessingFailed(msg) => UploadDocumentError::ProcessingFailed(msg),
            IngestionError::BlobStoreError(msg) => UploadDocumentError::StorageError(msg),
            other => UploadDocumentError::RepositoryError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub kb_id: Uuid,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub document_id: Uuid,
    pub file_name: String,
    pub status: String,
    pub process_type: Option<String>,
}

pub struct UploadDocumentUseCase {
    ingestion_service: Arc<IngestionService>,
}

impl UploadDocumentUseCase {
    pub fn new(ingestion_service: Arc<IngestionService>) -> Self {
        Self { ingestion_service }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        if request.bytes.is_empty() {
            return Err(UploadDocumentError::EmptyFile(request.file_name));
        }

        let document = self
            .ingestion_service
            .ingest_upload(
                request.kb_id,
                &request.file_name,
                request.bytes,
                request.content_type.as_deref(),
                request.user_id,
            )
            .await?;

        Ok(UploadDocumentResponse {
            document_id: document.id(),
            file_name: document.file_name().to_string(),
            status: document.status().to_string(),
            process_type: document.process_type().map(|p| p.to_string()),
        })
    }
}
