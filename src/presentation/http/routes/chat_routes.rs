use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route("/chat/ask", post(ChatHandler::ask))
        .route("/chat/ask/collection", post(ChatHandler::ask_collection))
        .route("/chat/sessions", post(ChatHandler::create_session))
        .route("/chat/sessions", get(ChatHandler::list_sessions))
        .route(
            "/chat/sessions/{session_id}/messages",
            get(ChatHandler::get_session_messages),
        )
        .route(
            "/chat/sessions/{session_id}",
            delete(ChatHandler::delete_session),
        )
        .with_state(handler)
}
