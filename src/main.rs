mod application;
mod domain;
mod infrastructure;
mod presentation;

use dotenv::dotenv;

use infrastructure::AppContainer;
use presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let container = AppContainer::new().await?;

    let port = std::env::var("PORT").ok().and_then(|p| p.parse().ok());

    let server = HttpServer::new(
        container.knowledge_base_handler.clone(),
        container.document_handler.clone(),
        container.chat_handler.clone(),
        port,
    );

    tracing::info!("starting server");
    server.run().await
}
