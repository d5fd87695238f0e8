pub mod chat_message_model;
pub mod chat_session_model;
pub mod document_model;
pub mod knowledge_base_model;

pub use chat_message_model::{ChatMessageModel, NewChatMessageModel};
pub use chat_session_model::{ChatSessionModel, NewChatSessionModel};
pub use document_model::{DocumentModel, NewDocumentModel};
pub use knowledge_base_model::{KnowledgeBaseModel, NewKnowledgeBaseModel};
