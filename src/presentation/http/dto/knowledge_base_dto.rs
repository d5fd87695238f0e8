use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::KnowledgeBase;

#[derive(Debug, Deserialize)]
pub struct CreateKnowledgeBaseRequestDto {
    pub name: String,
    pub description: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListKnowledgeBasesQueryDto {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeBaseResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub collection_id: Option<String>,
    pub embedding_model: String,
    pub embedding_provider: String,
    pub doc_count: i32,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&KnowledgeBase> for KnowledgeBaseResponseDto {
    fn from(kb: &KnowledgeBase) -> Self {
        Self {
            id: kb.id(),
            name: kb.name().to_string(),
            description: kb.description().map(|s| s.to_string()),
            collection_id: kb.collection_id().map(|s| s.to_string()),
            embedding_model: kb.embedding_model().to_string(),
            embedding_provider: kb.embedding_provider().to_string(),
            doc_count: kb.doc_count(),
            enabled: kb.is_enabled(),
            created_at: kb.created_at(),
            updated_at: kb.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KnowledgeBaseListResponseDto {
    pub knowledge_bases: Vec<KnowledgeBaseResponseDto>,
    pub total: usize,
}
