pub mod chat_message;
pub mod chat_session;
pub mod document;
pub mod knowledge_base;

pub use chat_message::ChatMessage;
pub use chat_session::ChatSession;
pub use document::Document;
pub use knowledge_base::KnowledgeBase;
