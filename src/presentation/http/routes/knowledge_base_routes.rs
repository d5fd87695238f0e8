use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::KnowledgeBaseHandler;

pub fn knowledge_base_routes(handler: Arc<KnowledgeBaseHandler>) -> Router {
    Router::new()
        .route(
            "/knowledge-bases",
            post(KnowledgeBaseHandler::create_knowledge_base),
        )
        .route(
            "/knowledge-bases",
            get(KnowledgeBaseHandler::list_knowledge_bases),
        )
        .route(
            "/knowledge-bases/{kb_id}",
            get(KnowledgeBaseHandler::get_knowledge_base),
        )
        .route(
            "/knowledge-bases/{kb_id}",
            delete(KnowledgeBaseHandler::delete_knowledge_base),
        )
        .with_state(handler)
}
