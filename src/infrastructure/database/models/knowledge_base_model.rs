use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::KnowledgeBase;
use crate::infrastructure::database::schema::knowledge_bases;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = knowledge_bases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KnowledgeBaseModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub collection_id: Option<String>,
    pub embedding_model: String,
    pub embedding_provider: String,
    pub doc_count: i32,
    pub enabled: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset, Deserialize)]
#[diesel(table_name = knowledge_bases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewKnowledgeBaseModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub collection_id: Option<String>,
    pub embedding_model: String,
    pub embedding_provider: String,
    pub doc_count: i32,
    pub enabled: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&KnowledgeBase> for NewKnowledgeBaseModel {
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
            user_id: kb.user_id(),
            created_at: kb.created_at(),
            updated_at: kb.updated_at(),
        }
    }
}

impl From<KnowledgeBaseModel> for KnowledgeBase {
    fn from(model: KnowledgeBaseModel) -> Self {
        KnowledgeBase::from_parts(
            model.id,
            model.name,
            model.description,
            model.collection_id,
            model.embedding_model,
            model.embedding_provider,
            model.doc_count,
            model.enabled,
            model.user_id,
            model.created_at,
            model.updated_at,
        )
    }
}
