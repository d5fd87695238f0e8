use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, ChatSession, chat_session::title_from_query};
use crate::domain::repositories::{MessageRepository, SessionRepository};

#[derive(Debug)]
pub enum ConversationError {
    SessionNotFound(Uuid),
    RepositoryError(String),
}

impl std::fmt::Display for ConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationError::SessionNotFound(id) => write!(f, "Chat session not found: {}", id),
            ConversationError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ConversationError {}

/// Sessions and their append-only messages. Supplies history to the RAG
/// orchestrator and receives the produced answer.
pub struct ConversationService {
    sessions: Arc<dyn SessionRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl ConversationService {
    pub fn new(sessions: Arc<dyn SessionRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { sessions, messages }
    }

    pub async fn create_session(
        &self,
        kb_id: Option<Uuid>,
        user_id: i64,
    ) -> Result<ChatSession, ConversationError> {
        let session = ChatSession::new(kb_id, user_id);
        self.sessions
            .save(&session)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?;
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<ChatSession, ConversationError> {
        self.sessions
            .find_by_id(id)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?
            .ok_or(ConversationError::SessionNotFound(id))
    }

    pub async fn list_sessions(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<ChatSession>, ConversationError> {
        self.sessions
            .find_all(user_id)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))
    }

    /// Messages are deleted in the same unit of work as the session.
    pub async fn delete_session(&self, id: Uuid) -> Result<(), ConversationError> {
        self.get_session(id).await?;
        self.messages
            .delete_by_session(id)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?;
        self.sessions
            .delete(id)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?;
        Ok(())
    }

    pub async fn messages(&self, session_id: Uuid) -> Result<Vec<ChatMessage>, ConversationError> {
        self.messages
            .find_by_session(session_id)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))
    }

    pub async fn save_user_message(
        &self,
        session_id: Uuid,
        content: &str,
    ) -> Result<ChatMessage, ConversationError> {
        let message = ChatMessage::user(session_id, content.to_string());
        self.messages
            .save(&message)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?;
        Ok(message)
    }

    pub async fn save_assistant_message(
        &self,
        session_id: Uuid,
        content: &str,
        sources: Option<String>,
        token_count: Option<i32>,
    ) -> Result<ChatMessage, ConversationError> {
        let message = ChatMessage::assistant(session_id, content.to_string(), sources, token_count);
        self.messages
            .save(&message)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?;
        Ok(message)
    }

    /// Set on the very first exchange only; later turns leave it alone.
    pub async fn set_title_from_query(
        &self,
        session_id: Uuid,
        query: &str,
    ) -> Result<(), ConversationError> {
        let mut session = self.get_session(session_id).await?;
        session.set_title(title_from_query(query));
        self.sessions
            .update(&session)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{InMemoryMessages, InMemorySessions};
    use crate::domain::entities::chat_session::TITLE_MAX_CHARS;
    use crate::domain::value_objects::MessageRole;

    fn service() -> ConversationService {
        ConversationService::new(
            Arc::new(InMemorySessions::new()),
            Arc::new(InMemoryMessages::new()),
        )
    }

    #[tokio::test]
    async fn test_messages_are_ordered_by_creation() {
        let service = service();
        let session = service.create_session(None, 1).await.unwrap();

        service
            .save_user_message(session.id(), "first")
            .await
            .unwrap();
        service
            .save_assistant_message(session.id(), "second", None, None)
            .await
            .unwrap();
        service
            .save_user_message(session.id(), "third")
            .await
            .unwrap();

        let messages = service.messages(session.id()).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(messages[0].role(), MessageRole::User);
        assert_eq!(messages[1].role(), MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_title_is_truncated_from_query() {
        let service = service();
        let session = service.create_session(None, 1).await.unwrap();

        let long_query = "why ".repeat(40);
        service
            .set_title_from_query(session.id(), &long_query)
            .await
            .unwrap();

        let session = service.get_session(session.id()).await.unwrap();
        assert!(session.title().ends_with("..."));
        assert_eq!(session.title().chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[tokio::test]
    async fn test_delete_session_cascades_to_messages() {
        let service = service();
        let session = service.create_session(None, 1).await.unwrap();
        service
            .save_user_message(session.id(), "hello")
            .await
            .unwrap();

        service.delete_session(session.id()).await.unwrap();

        assert!(matches!(
            service.get_session(session.id()).await,
            Err(ConversationError::SessionNotFound(_))
        ));
        assert!(service.messages(session.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_session_is_not_found() {
        let service = service();
        let result = service.delete_session(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ConversationError::SessionNotFound(_))));
    }
}
