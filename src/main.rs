use std::net::SocketAddr;
use std::sync::Arc;

use doc_chat::chat::ChatService;
use doc_chat::llm::OpenAIClient;
use doc_chat::session::SessionStore;
use doc_chat::{config::Config, routes::create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_chat=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credential is fatal here
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);
    info!(model = %config.llm.model, base_url = %config.llm.base_url, "Completion service configured");

    let client = OpenAIClient::with_base_url(&config.llm.api_key, &config.llm.base_url);
    let chat = ChatService::new(Arc::new(client)).with_model(config.llm.model.clone());

    let state = AppState {
        config: config.clone(),
        sessions: SessionStore::new(),
        chat,
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
