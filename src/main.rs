mod command;
mod config;
mod error;
mod graph;
mod llm;
mod prompts;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::llm::LlmChat;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env();

    let catalog = prompts::Catalog::load(config.prompts_path.as_deref(), config.prd_path.as_deref())
        .expect("prompt catalog load failed");

    // Initialize LLM client (non-fatal: classification disabled if config missing).
    let llm: Option<Arc<dyn LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; change classification disabled");
            None
        }
    };

    let state = state::AppState::new(catalog, llm).with_classify_max_tokens(config.classify_max_tokens);
    let app = routes::app(state, &config.cors_origins, config.static_dir.as_deref());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "promptdeck listening");
    axum::serve(listener, app).await.expect("server failed");
}
