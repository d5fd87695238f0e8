use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route(
            "/knowledge-bases/{kb_id}/documents",
            post(DocumentHandler::upload_document),
        )
        .route(
            "/knowledge-bases/{kb_id}/documents/text",
            post(DocumentHandler::create_text_document),
        )
        .route(
            "/knowledge-bases/{kb_id}/documents",
            get(DocumentHandler::list_documents),
        )
        .route(
            "/knowledge-bases/{kb_id}/retrieve",
            post(DocumentHandler::retrieve),
        )
        .route(
            "/documents/{document_id}",
            delete(DocumentHandler::delete_document),
        )
        .with_state(handler)
}
