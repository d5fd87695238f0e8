use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ChatMessage;
use crate::domain::repositories::{MessageRepository, message_repository::MessageRepositoryError};
use crate::infrastructure::database::models::{ChatMessageModel, NewChatMessageModel};
use crate::infrastructure::database::schema::chat_messages::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresMessageRepository {
    pool: DbPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn save(&self, message: &ChatMessage) -> Result<(), MessageRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        let new_message = NewChatMessageModel::from(message);

        diesel::insert_into(chat_messages)
            .values(&new_message)
            .execute(&mut conn)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_session(
        &self,
        session: Uuid,
    ) -> Result<Vec<ChatMessage>, MessageRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        let models = chat_messages
            .filter(session_id.eq(session))
            .order(created_at.asc())
            .load::<ChatMessageModel>(&mut conn)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        for model in models {
            let message = ChatMessage::try_from(model)
                .map_err(MessageRepositoryError::DatabaseError)?;
            results.push(message);
        }

        Ok(results)
    }

    async fn count_by_session(&self, session: Uuid) -> Result<i64, MessageRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        chat_messages
            .filter(session_id.eq(session))
            .count()
            .get_result(&mut conn)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))
    }

    async fn delete_by_session(&self, session: Uuid) -> Result<usize, MessageRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))?;

        diesel::delete(chat_messages.filter(session_id.eq(session)))
            .execute(&mut conn)
            .map_err(|e| MessageRepositoryError::DatabaseError(e.to_string()))
    }
}
