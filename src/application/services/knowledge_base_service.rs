use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::RetrievalGateway;
use crate::domain::entities::{Document, KnowledgeBase};
use crate::domain::repositories::{DocumentRepository, KnowledgeBaseRepository};

#[derive(Debug)]
pub enum KnowledgeBaseError {
    NotFound(Uuid),
    ProvisioningFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for KnowledgeBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeBaseError::NotFound(id) => write!(f, "Knowledge base not found: {}", id),
            KnowledgeBaseError::ProvisioningFailed(msg) => {
                write!(f, "Collection provisioning failed: {}", msg)
            }
            KnowledgeBaseError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for KnowledgeBaseError {}

/// Knowledge-base lifecycle: the external collection is provisioned before
/// the local row exists, and deletion is locally unconditional with a
/// best-effort remote cleanup.
pub struct KnowledgeBaseService {
    knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
    documents: Arc<dyn DocumentRepository>,
    retrieval: Arc<dyn RetrievalGateway>,
    embedding_model: String,
    embedding_provider: String,
}

impl KnowledgeBaseService {
    pub fn new(
        knowledge_bases: Arc<dyn KnowledgeBaseRepository>,
        documents: Arc<dyn DocumentRepository>,
        retrieval: Arc<dyn RetrievalGateway>,
        embedding_model: String,
        embedding_provider: String,
    ) -> Self {
        Self {
            knowledge_bases,
            documents,
            retrieval,
            embedding_model,
            embedding_provider,
        }
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        user_id: i64,
    ) -> Result<KnowledgeBase, KnowledgeBaseError> {
        let collection_id = self
            .retrieval
            .create_collection(name, description)
            .await
            .map_err(|e| KnowledgeBaseError::ProvisioningFailed(e.to_string()))?;

        tracing::info!(name, collection_id, "external collection provisioned");

        let kb = KnowledgeBase::new(
            name.to_string(),
            description.map(|s| s.to_string()),
            collection_id,
            self.embedding_model.clone(),
            self.embedding_provider.clone(),
            user_id,
        );
        self.knowledge_bases
            .save(&kb)
            .await
            .map_err(|e| KnowledgeBaseError::RepositoryError(e.to_string()))?;

        Ok(kb)
    }

    pub async fn get(&self, kb_id: Uuid) -> Result<KnowledgeBase, KnowledgeBaseError> {
        self.knowledge_bases
            .find_by_id(kb_id)
            .await
            .map_err(|e| KnowledgeBaseError::RepositoryError(e.to_string()))?
            .ok_or(KnowledgeBaseError::NotFound(kb_id))
    }

    pub async fn list(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<KnowledgeBase>, KnowledgeBaseError> {
        self.knowledge_bases
            .find_all(user_id)
            .await
            .map_err(|e| KnowledgeBaseError::RepositoryError(e.to_string()))
    }

    pub async fn list_documents(&self, kb_id: Uuid) -> Result<Vec<Document>, KnowledgeBaseError> {
        self.get(kb_id).await?;
        self.documents
            .find_by_kb(kb_id)
            .await
            .map_err(|e| KnowledgeBaseError::RepositoryError(e.to_string()))
    }

    /// Deletion cascades to local documents. The remote collection delete is
    /// logged and swallowed on failure.
    pub async fn delete(&self, kb_id: Uuid) -> Result<(), KnowledgeBaseError> {
        let kb = self.get(kb_id).await?;

        if let Some(collection_id) = kb.collection_id() {
            if let Err(e) = self.retrieval.delete_collection(collection_id).await {
                tracing::warn!(%kb_id, error = %e, "failed to delete external collection");
            }
        }

        self.documents
            .delete_by_kb(kb_id)
            .await
            .map_err(|e| KnowledgeBaseError::RepositoryError(e.to_string()))?;
        self.knowledge_bases
            .delete(kb_id)
            .await
            .map_err(|e| KnowledgeBaseError::RepositoryError(e.to_string()))?;

        tracing::info!(%kb_id, "knowledge base deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        InMemoryDocuments, InMemoryKnowledgeBases, StubRetrieval,
    };

    fn service() -> (
        Arc<InMemoryKnowledgeBases>,
        Arc<InMemoryDocuments>,
        Arc<StubRetrieval>,
        KnowledgeBaseService,
    ) {
        let knowledge_bases = Arc::new(InMemoryKnowledgeBases::new());
        let documents = Arc::new(InMemoryDocuments::new());
        let retrieval = Arc::new(StubRetrieval::new());
        let service = KnowledgeBaseService::new(
            knowledge_bases.clone(),
            documents.clone(),
            retrieval.clone(),
            "text-embedding-3-small".to_string(),
            "builtin".to_string(),
        );
        (knowledge_bases, documents, retrieval, service)
    }

    #[tokio::test]
    async fn test_create_provisions_collection_first() {
        let (repos, _, retrieval, service) = service();
        let kb = service.create("manuals", Some("desc"), 1).await.unwrap();

        assert!(kb.collection_id().is_some());
        assert_eq!(kb.doc_count(), 0);
        assert_eq!(retrieval.created_collections(), vec!["manuals".to_string()]);
        assert!(repos.find_sync(kb.id()).is_some());
    }

    #[tokio::test]
    async fn test_provisioning_failure_aborts_creation() {
        let (repos, _, retrieval, service) = service();
        retrieval.fail_create_collection(true);

        let result = service.create("manuals", None, 1).await;
        assert!(matches!(
            result,
            Err(KnowledgeBaseError::ProvisioningFailed(_))
        ));
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn test_delete_swallows_remote_failure() {
        let (repos, _, retrieval, service) = service();
        let kb = service.create("manuals", None, 1).await.unwrap();

        retrieval.fail_delete_collection(true);
        service.delete(kb.id()).await.unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let (_, _, _, service) = service();
        let result = service.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(KnowledgeBaseError::NotFound(_))));
    }
}
