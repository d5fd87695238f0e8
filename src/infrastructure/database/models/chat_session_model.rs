use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::ChatSession;
use crate::infrastructure::database::schema::chat_sessions;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = chat_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatSessionModel {
    pub id: Uuid,
    pub title: String,
    pub kb_id: Option<Uuid>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset, Deserialize)]
#[diesel(table_name = chat_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatSessionModel {
    pub id: Uuid,
    pub title: String,
    pub kb_id: Option<Uuid>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ChatSession> for NewChatSessionModel {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id(),
            title: session.title().to_string(),
            kb_id: session.kb_id(),
            user_id: session.user_id(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

impl From<ChatSessionModel> for ChatSession {
    fn from(model: ChatSessionModel) -> Self {
        ChatSession::from_parts(
            model.id,
            model.title,
            model.kb_id,
            model.user_id,
            model.created_at,
            model.updated_at,
        )
    }
}
