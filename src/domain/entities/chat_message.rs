use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::MessageRole;

/// One turn in a chat session. Append-only; ordered by creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: Uuid,
    session_id: Uuid,
    role: MessageRole,
    content: String,
    sources: Option<String>,
    token_count: Option<i32>,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(session_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role: MessageRole::User,
            content,
            sources: None,
            token_count: None,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(
        session_id: Uuid,
        content: String,
        sources: Option<String>,
        token_count: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role: MessageRole::Assistant,
            content,
            sources,
            token_count,
            created_at: Utc::now(),
        }
    }

    pub fn from_parts(
        id: Uuid,
        session_id: Uuid,
        role: MessageRole,
        content: String,
        sources: Option<String>,
        token_count: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            session_id,
            role,
            content,
            sources,
            token_count,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sources(&self) -> Option<&str> {
        self.sources.as_deref()
    }

    pub fn token_count(&self) -> Option<i32> {
        self.token_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
