use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Document;

#[derive(Debug)]
pub enum DocumentRepositoryError {
    NotFound(Uuid),
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for DocumentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRepositoryError::NotFound(id) => write!(f, "Document not found: {}", id),
            DocumentRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            DocumentRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentRepositoryError {}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError>;

    async fn find_by_kb(&self, kb_id: Uuid) -> Result<Vec<Document>, DocumentRepositoryError>;

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError>;

    async fn delete_by_kb(&self, kb_id: Uuid) -> Result<usize, DocumentRepositoryError>;

    async fn count_by_kb(&self, kb_id: Uuid) -> Result<i64, DocumentRepositoryError>;
}
