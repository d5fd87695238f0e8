pub mod chat_routes;
pub mod document_routes;
pub mod health_routes;
pub mod knowledge_base_routes;

pub use chat_routes::*;
pub use document_routes::*;
pub use health_routes::*;
pub use knowledge_base_routes::*;
