use std::sync::Arc;

use crate::{
    application::{
        ports::{BlobStore, GenerationGateway, RetrievalGateway},
        services::{ConversationService, IngestionService, KnowledgeBaseService, RagService},
        use_cases::{
            AskCollectionUseCase, AskQuestionUseCase, CreateKnowledgeBaseUseCase,
            CreateTextDocumentUseCase, DeleteDocumentUseCase, DeleteKnowledgeBaseUseCase,
            RetrievePassagesUseCase, UploadDocumentUseCase,
        },
    },
    domain::repositories::{
        DocumentRepository, KnowledgeBaseRepository, MessageRepository, SessionRepository,
    },
    infrastructure::{
        database::{
            create_connection_pool, get_database_connection,
            repositories::{
                PostgresDocumentRepository, PostgresKnowledgeBaseRepository,
                PostgresMessageRepository, PostgresSessionRepository,
            },
            run_migrations,
        },
        external_services::{HttpGenerationClient, HttpRetrievalClient},
        object_storage::LocalBlobStore,
    },
    presentation::http::handlers::{ChatHandler, DocumentHandler, KnowledgeBaseHandler},
};

pub struct AppContainer {
    // Repositories
    pub knowledge_base_repository: Arc<dyn KnowledgeBaseRepository>,
    pub document_repository: Arc<dyn DocumentRepository>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub message_repository: Arc<dyn MessageRepository>,

    // External services
    pub retrieval_gateway: Arc<dyn RetrievalGateway>,
    pub generation_gateway: Arc<dyn GenerationGateway>,
    pub blob_store: Arc<dyn BlobStore>,

    // Application services
    pub ingestion_service: Arc<IngestionService>,
    pub rag_service: Arc<RagService>,
    pub knowledge_base_service: Arc<KnowledgeBaseService>,
    pub conversation_service: Arc<ConversationService>,

    // Use cases
    pub create_knowledge_base_use_case: Arc<CreateKnowledgeBaseUseCase>,
    pub delete_knowledge_base_use_case: Arc<DeleteKnowledgeBaseUseCase>,
    pub upload_document_use_case: Arc<UploadDocumentUseCase>,
    pub create_text_document_use_case: Arc<CreateTextDocumentUseCase>,
    pub delete_document_use_case: Arc<DeleteDocumentUseCase>,
    pub retrieve_passages_use_case: Arc<RetrievePassagesUseCase>,
    pub ask_question_use_case: Arc<AskQuestionUseCase>,
    pub ask_collection_use_case: Arc<AskCollectionUseCase>,

    // HTTP handlers
    pub knowledge_base_handler: Arc<KnowledgeBaseHandler>,
    pub document_handler: Arc<DocumentHandler>,
    pub chat_handler: Arc<ChatHandler>,
}

impl AppContainer {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Database pool and migrations
        let db_pool = create_connection_pool()?;
        let mut conn = get_database_connection()
            .map_err(|e| format!("Failed to create database connection: {}", e))?;
        run_migrations(&mut conn)
            .map_err(|e| format!("Failed to run database migrations: {}", e))?;

        // Repositories
        let knowledge_base_repository: Arc<dyn KnowledgeBaseRepository> =
            Arc::new(PostgresKnowledgeBaseRepository::new(db_pool.clone()));
        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(PostgresSessionRepository::new(db_pool.clone()));
        let message_repository: Arc<dyn MessageRepository> =
            Arc::new(PostgresMessageRepository::new(db_pool));

        // External services
        let retrieval_gateway: Arc<dyn RetrievalGateway> =
            Arc::new(HttpRetrievalClient::from_env()?);
        let generation_gateway: Arc<dyn GenerationGateway> =
            Arc::new(HttpGenerationClient::from_env()?);
        let blob_store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::from_env());

        let embedding_model = std::env::var("KB_EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());
        let embedding_provider =
            std::env::var("KB_EMBEDDING_PROVIDER").unwrap_or_else(|_| "builtin".to_string());
        let video_url_ttl_secs = std::env::var("BLOB_URL_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        // Application services
        let ingestion_service = Arc::new(
            IngestionService::new(
                knowledge_base_repository.clone(),
                document_repository.clone(),
                retrieval_gateway.clone(),
                generation_gateway.clone(),
                blob_store.clone(),
            )
            .with_video_url_ttl(video_url_ttl_secs),
        );

        let rag_service = Arc::new(RagService::new(
            knowledge_base_repository.clone(),
            retrieval_gateway.clone(),
            generation_gateway.clone(),
        ));

        let knowledge_base_service = Arc::new(KnowledgeBaseService::new(
            knowledge_base_repository.clone(),
            document_repository.clone(),
            retrieval_gateway.clone(),
            embedding_model,
            embedding_provider,
        ));

        let conversation_service = Arc::new(ConversationService::new(
            session_repository.clone(),
            message_repository.clone(),
        ));

        // Use cases
        let create_knowledge_base_use_case = Arc::new(CreateKnowledgeBaseUseCase::new(
            knowledge_base_service.clone(),
        ));
        let delete_knowledge_base_use_case = Arc::new(DeleteKnowledgeBaseUseCase::new(
            knowledge_base_service.clone(),
        ));
        let upload_document_use_case =
            Arc::new(UploadDocumentUseCase::new(ingestion_service.clone()));
        let create_text_document_use_case =
            Arc::new(CreateTextDocumentUseCase::new(ingestion_service.clone()));
        let delete_document_use_case =
            Arc::new(DeleteDocumentUseCase::new(ingestion_service.clone()));
        let retrieve_passages_use_case =
            Arc::new(RetrievePassagesUseCase::new(rag_service.clone()));
        let ask_question_use_case = Arc::new(AskQuestionUseCase::new(
            rag_service.clone(),
            conversation_service.clone(),
        ));
        let ask_collection_use_case = Arc::new(AskCollectionUseCase::new(rag_service.clone()));

        // HTTP handlers
        let knowledge_base_handler = Arc::new(KnowledgeBaseHandler::new(
            create_knowledge_base_use_case.clone(),
            delete_knowledge_base_use_case.clone(),
            knowledge_base_service.clone(),
        ));
        let document_handler = Arc::new(DocumentHandler::new(
            upload_document_use_case.clone(),
            create_text_document_use_case.clone(),
            delete_document_use_case.clone(),
            retrieve_passages_use_case.clone(),
            knowledge_base_service.clone(),
        ));
        let chat_handler = Arc::new(ChatHandler::new(
            ask_question_use_case.clone(),
            ask_collection_use_case.clone(),
            conversation_service.clone(),
        ));

        Ok(Self {
            knowledge_base_repository,
            document_repository,
            session_repository,
            message_repository,
            retrieval_gateway,
            generation_gateway,
            blob_store,
            ingestion_service,
            rag_service,
            knowledge_base_service,
            conversation_service,
            create_knowledge_base_use_case,
            delete_knowledge_base_use_case,
            upload_document_use_case,
            create_text_document_use_case,
            delete_document_use_case,
            retrieve_passages_use_case,
            ask_question_use_case,
            ask_collection_use_case,
            knowledge_base_handler,
            document_handler,
            chat_handler,
        })
    }
}
