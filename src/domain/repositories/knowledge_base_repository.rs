use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::KnowledgeBase;

#[derive(Debug)]
pub enum KnowledgeBaseRepositoryError {
    NotFound(Uuid),
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for KnowledgeBaseRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeBaseRepositoryError::NotFound(id) => {
                write!(f, "Knowledge base not found: {}", id)
            }
            KnowledgeBaseRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            KnowledgeBaseRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for KnowledgeBaseRepositoryError {}

#[async_trait]
pub trait KnowledgeBaseRepository: Send + Sync {
    async fn save(&self, kb: &KnowledgeBase) -> Result<(), KnowledgeBaseRepositoryError>;

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<KnowledgeBase>, KnowledgeBaseRepositoryError>;

    async fn find_all(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<KnowledgeBase>, KnowledgeBaseRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, KnowledgeBaseRepositoryError>;

    /// Atomic counter update; must not be a read-modify-write at this layer.
    async fn increment_doc_count(&self, id: Uuid) -> Result<(), KnowledgeBaseRepositoryError>;

    /// Atomic counter update, floored at zero.
    async fn decrement_doc_count(&self, id: Uuid) -> Result<(), KnowledgeBaseRepositoryError>;
}
