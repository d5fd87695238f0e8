use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{KnowledgeBaseError, KnowledgeBaseService};

#[derive(Debug)]
pub enum DeleteKnowledgeBaseError {
    NotFound(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for DeleteKnowledgeBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteKnowledgeBaseError::NotFound(id) => write!(f, "Knowledge base not found: {}", id),
            DeleteKnowledgeBaseError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DeleteKnowledgeBaseError {}

impl From<KnowledgeBaseError> for DeleteKnowledgeBaseError {
    fn from(error: KnowledgeBaseError) -> Self {
        match error {
            KnowledgeBaseError::NotFound(id) => DeleteKnowledgeBaseError::NotFound(id),
            other => DeleteKnowledgeBaseError::RepositoryError(other.to_string()),
        }
    }
}

pub struct DeleteKnowledgeBaseUseCase {
    knowledge_base_service: Arc<KnowledgeBaseService>,
}

impl DeleteKnowledgeBaseUseCase {
    pub fn new(knowledge_base_service: Arc<KnowledgeBaseService>) -> Self {
        Self {
            knowledge_base_service,
        }
    }

    pub async fn execute(&self, kb_id: Uuid) -> Result<(), DeleteKnowledgeBaseError> {
        self.knowledge_base_service.delete(kb_id).await?;
        Ok(())
    }
}
