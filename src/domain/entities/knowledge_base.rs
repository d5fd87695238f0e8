use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of ingested documents, mirrored by an external search
/// collection where the indexed content actually lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    id: Uuid,
    name: String,
    description: Option<String>,
    collection_id: Option<String>,
    embedding_model: String,
    embedding_provider: String,
    doc_count: i32,
    enabled: bool,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl KnowledgeBase {
    pub fn new(
        name: String,
        description: Option<String>,
        collection_id: String,
        embedding_model: String,
        embedding_provider: String,
        user_id: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            collection_id: Some(collection_id),
            embedding_model,
            embedding_provider,
            doc_count: 0,
            enabled: true,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        name: String,
        description: Option<String>,
        collection_id: Option<String>,
        embedding_model: String,
        embedding_provider: String,
        doc_count: i32,
        enabled: bool,
        user_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            collection_id,
            embedding_model,
            embedding_provider,
            doc_count,
            enabled,
            user_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn collection_id(&self) -> Option<&str> {
        self.collection_id.as_deref()
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn embedding_provider(&self) -> &str {
        &self.embedding_provider
    }

    pub fn doc_count(&self) -> i32 {
        self.doc_count
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
