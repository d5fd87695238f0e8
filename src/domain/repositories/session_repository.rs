use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ChatSession;

#[derive(Debug)]
pub enum SessionRepositoryError {
    NotFound(Uuid),
    DatabaseError(String),
}

impl std::fmt::Display for SessionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionRepositoryError::NotFound(id) => write!(f, "Chat session not found: {}", id),
            SessionRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for SessionRepositoryError {}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn save(&self, session: &ChatSession) -> Result<(), SessionRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChatSession>, SessionRepositoryError>;

    /// Newest-first by update time.
    async fn find_all(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<ChatSession>, SessionRepositoryError>;

    async fn update(&self, session: &ChatSession) -> Result<(), SessionRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, SessionRepositoryError>;
}
