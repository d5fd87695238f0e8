use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::rag_service::RagSource;
use crate::domain::entities::{ChatMessage, ChatSession};

#[derive(Debug, Deserialize)]
pub struct AskRequestDto {
    pub kb_id: Uuid,
    pub session_id: Option<Uuid>,
    pub query: String,
    pub top_k: Option<i32>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AskCollectionRequestDto {
    pub collection_id: String,
    pub query: String,
    pub top_k: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponseDto {
    pub session_id: Option<Uuid>,
    pub answer: String,
    pub sources: Vec<RagSource>,
    pub retrieval_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequestDto {
    pub kb_id: Option<Uuid>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListSessionsQueryDto {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponseDto {
    pub id: Uuid,
    pub title: String,
    pub kb_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ChatSession> for SessionResponseDto {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id(),
            title: session.title().to_string(),
            kb_id: session.kb_id(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionListResponseDto {
    pub sessions: Vec<SessionResponseDto>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponseDto {
    pub id: Uuid,
    pub role: String,
    pub content: String,
    pub sources: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageResponseDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id(),
            role: message.role().to_string(),
            content: message.content().to_string(),
            sources: message.sources().map(|s| s.to_string()),
            created_at: message.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageListResponseDto {
    pub messages: Vec<ChatMessageResponseDto>,
    pub total: usize,
}
