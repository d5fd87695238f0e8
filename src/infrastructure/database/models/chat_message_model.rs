use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::ChatMessage;
use crate::domain::value_objects::MessageRole;
use crate::infrastructure::database::schema::chat_messages;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatMessageModel {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub sources: Option<String>,
    pub token_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = chat_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChatMessageModel {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub sources: Option<String>,
    pub token_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for NewChatMessageModel {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id(),
            session_id: message.session_id(),
            role: message.role().to_string(),
            content: message.content().to_string(),
            sources: message.sources().map(|s| s.to_string()),
            token_count: message.token_count(),
            created_at: message.created_at(),
        }
    }
}

impl TryFrom<ChatMessageModel> for ChatMessage {
    type Error = String;

    fn try_from(model: ChatMessageModel) -> Result<Self, Self::Error> {
        let role = MessageRole::from_str(&model.role)?;

        Ok(ChatMessage::from_parts(
            model.id,
            model.session_id,
            role,
            model.content,
            model.sources,
            model.token_count,
            model.created_at,
        ))
    }
}
