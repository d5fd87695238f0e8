use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ChatMessage;

#[derive(Debug)]
pub enum MessageRepositoryError {
    DatabaseError(String),
}

impl std::fmt::Display for MessageRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for MessageRepositoryError {}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn save(&self, message: &ChatMessage) -> Result<(), MessageRepositoryError>;

    /// Ascending by creation time.
    async fn find_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<ChatMessage>, MessageRepositoryError>;

    async fn count_by_session(&self, session_id: Uuid) -> Result<i64, MessageRepositoryError>;

    async fn delete_by_session(&self, session_id: Uuid) -> Result<usize, MessageRepositoryError>;
}
