use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{KnowledgeBaseError, KnowledgeBaseService};

#[derive(Debug)]
pub enum CreateKnowledgeBaseError {
    InvalidName(String),
    ProvisioningFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for CreateKnowledgeBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateKnowledgeBaseError::InvalidName(msg) => write!(f, "Invalid name: {}", msg),
            CreateKnowledgeBaseError::ProvisioningFailed(msg) => {
                write!(f, "Provisioning failed: {}", msg)
            }
            CreateKnowledgeBaseError::RepositoryError(msg) => {
                write!(f, "Repository error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CreateKnowledgeBaseError {}

impl From<KnowledgeBaseError> for CreateKnowledgeBaseError {
    fn from(error: KnowledgeBaseError) -> Self {
        match error {
            KnowledgeBaseError::ProvisioningFailed(msg) => {
                CreateKnowledgeBaseError::ProvisioningFailed(msg)
            }
            other => CreateKnowledgeBaseError::RepositoryError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateKnowledgeBaseRequest {
    pub name: String,
    pub description: Option<String>,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct CreateKnowledgeBaseResponse {
    pub kb_id: Uuid,
    pub name: String,
    pub collection_id: Option<String>,
}

pub struct CreateKnowledgeBaseUseCase {
    knowledge_base_service: Arc<KnowledgeBaseService>,
}

impl CreateKnowledgeBaseUseCase {
    pub fn new(knowledge_base_service: Arc<KnowledgeBaseService>) -> Self {
        Self {
            knowledge_base_service,
        }
    }

    pub async fn execute(
        &self,
        request: CreateKnowledgeBaseRequest,
    ) -> Result<CreateKnowledgeBaseResponse, CreateKnowledgeBaseError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(CreateKnowledgeBaseError::InvalidName(
                "name must not be empty".to_string(),
            ));
        }

        let kb = self
            .knowledge_base_service
            .create(name, request.description.as_deref(), request.user_id)
            .await?;

        Ok(CreateKnowledgeBaseResponse {
            kb_id: kb.id(),
            name: kb.name().to_string(),
            collection_id: kb.collection_id().map(|s| s.to_string()),
        })
    }
}
