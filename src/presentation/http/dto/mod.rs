pub mod chat_dto;
pub mod document_dto;
pub mod knowledge_base_dto;
pub mod response_dto;

pub use chat_dto::*;
pub use document_dto::*;
pub use knowledge_base_dto::*;
pub use response_dto::*;
