use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    handlers::{ChatHandler, DocumentHandler, KnowledgeBaseHandler},
    routes::{chat_routes, document_routes, health_routes, knowledge_base_routes},
};

pub struct HttpServer {
    knowledge_base_handler: Arc<KnowledgeBaseHandler>,
    document_handler: Arc<DocumentHandler>,
    chat_handler: Arc<ChatHandler>,
    port: u16,
}

impl HttpServer {
    pub fn new(
        knowledge_base_handler: Arc<KnowledgeBaseHandler>,
        document_handler: Arc<DocumentHandler>,
        chat_handler: Arc<ChatHandler>,
        port: Option<u16>,
    ) -> Self {
        Self {
            knowledge_base_handler,
            document_handler,
            chat_handler,
            port: port.unwrap_or(3000),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = Router::new()
            .merge(health_routes())
            .merge(knowledge_base_routes(self.knowledge_base_handler))
            .merge(document_routes(self.document_handler))
            .merge(chat_routes(self.chat_handler))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(250 * 1024 * 1024)) // 250MB cap
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(method = %request.method(), uri = %request.uri(), "request");
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                status = %response.status(),
                                latency_ms = latency.as_millis() as u64,
                                "response"
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                error = ?error,
                                latency_ms = latency.as_millis() as u64,
                                "request failed"
                            );
                        },
                    ),
            );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!(%addr, "listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
