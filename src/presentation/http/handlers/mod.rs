pub mod chat_handler;
pub mod document_handler;
pub mod knowledge_base_handler;

pub use chat_handler::ChatHandler;
pub use document_handler::DocumentHandler;
pub use knowledge_base_handler::KnowledgeBaseHandler;
