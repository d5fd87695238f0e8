pub mod conversation_service;
pub mod ingestion_service;
pub mod knowledge_base_service;
pub mod rag_service;

pub use conversation_service::{ConversationError, ConversationService};
pub use ingestion_service::{IngestionError, IngestionService};
pub use knowledge_base_service::{KnowledgeBaseError, KnowledgeBaseService};
pub use rag_service::{RagError, RagService};
