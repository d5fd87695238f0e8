pub mod postgres_document_repository;
pub mod postgres_knowledge_base_repository;
pub mod postgres_message_repository;
pub mod postgres_session_repository;

pub use postgres_document_repository::PostgresDocumentRepository;
pub use postgres_knowledge_base_repository::PostgresKnowledgeBaseRepository;
pub use postgres_message_repository::PostgresMessageRepository;
pub use postgres_session_repository::PostgresSessionRepository;
