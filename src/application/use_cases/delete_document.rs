use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{IngestionError, IngestionService};

#[derive(Debug)]
pub enum DeleteDocumentError {
    NotFound(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for DeleteDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteDocumentError::NotFound(id) => write!(f, "Document not found: {}", id),
            DeleteDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteDocumentError {}

impl From<IngestionError> for DeleteDocumentError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::DocumentNotFound(id) => DeleteDocumentError::NotFound(id),
            other => DeleteDocumentError::RepositoryError(other.to_string()),
        }
    }
}

pub struct DeleteDocumentUseCase {
    ingestion_service: Arc<IngestionService>,
}

impl DeleteDocumentUseCase {
    pub fn new(ingestion_service: Arc<IngestionService>) -> Self {
        Self { ingestion_service }
    }

    pub async fn execute(&self, document_id: Uuid) -> Result<(), DeleteDocumentError> {
        self.ingestion_service.delete_document(document_id).await?;
        Ok(())
    }
}
