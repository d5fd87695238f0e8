use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::ChatSession;
use crate::domain::repositories::{SessionRepository, session_repository::SessionRepositoryError};
use crate::infrastructure::database::models::{ChatSessionModel, NewChatSessionModel};
use crate::infrastructure::database::schema::chat_sessions::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresSessionRepository {
    pool: DbPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &ChatSession) -> Result<(), SessionRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        let new_session = NewChatSessionModel::from(session);

        diesel::insert_into(chat_sessions)
            .values(&new_session)
            .execute(&mut conn)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: Uuid,
    ) -> Result<Option<ChatSession>, SessionRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        let result = chat_sessions
            .find(session_id)
            .first::<ChatSessionModel>(&mut conn)
            .optional()
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.map(ChatSession::from))
    }

    async fn find_all(
        &self,
        owner: Option<i64>,
    ) -> Result<Vec<ChatSession>, SessionRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        let mut query = chat_sessions.order(updated_at.desc()).into_boxed();
        if let Some(owner_id) = owner {
            query = query.filter(user_id.eq(owner_id));
        }

        let models = query
            .load::<ChatSessionModel>(&mut conn)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(ChatSession::from).collect())
    }

    async fn update(&self, session: &ChatSession) -> Result<(), SessionRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        let changes = NewChatSessionModel::from(session);

        let updated = diesel::update(chat_sessions.find(session.id()))
            .set(&changes)
            .execute(&mut conn)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        if updated == 0 {
            return Err(SessionRepositoryError::NotFound(session.id()));
        }
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> Result<bool, SessionRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        let deleted = diesel::delete(chat_sessions.find(session_id))
            .execute(&mut conn)
            .map_err(|e| SessionRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted > 0)
    }
}
