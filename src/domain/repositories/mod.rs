pub mod document_repository;
pub mod knowledge_base_repository;
pub mod message_repository;
pub mod session_repository;

pub use document_repository::DocumentRepository;
pub use knowledge_base_repository::KnowledgeBaseRepository;
pub use message_repository::MessageRepository;
pub use session_repository::SessionRepository;
