//! CV chatbot server binary
//!
//! Run with: cargo run -p cv-rag --bin cv-rag-server

use std::sync::Arc;

use cv_rag::{
    config::RagConfig, index::VectorBackend, providers::OpenAiClient, server::RagServer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is read first so it can also set RUST_LOG
    let dotenv = RagConfig::load_dotenv(None);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cv_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                   CV Analysis Chatbot                     ║
║              Ask questions about an uploaded CV           ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    match dotenv {
        Ok(Some(path)) => tracing::info!("Loaded environment from {}", path.display()),
        Ok(None) => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("{}", e),
    }

    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Data directory: {}", config.storage.data_dir.display());
    tracing::info!("  - Storage directory: {}", config.storage.persist_dir.display());
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Stale snapshot policy: {:?}", config.index.stale_policy);

    let client = Arc::new(OpenAiClient::new(&config.llm)?);
    if !client.has_api_key() {
        tracing::warn!("No API key found in OpenAI_Key or OPENAI_API_KEY");
        tracing::warn!("The server will start, but indexing and questions will fail until one is set");
    }

    let backend = Arc::new(VectorBackend::new(
        client.clone(),
        client,
        &config.chunking,
        &config.retrieval,
        &config.llm,
    ));

    let server = RagServer::new(config, backend).await?;

    println!("\nServer starting...");
    println!("  Chat: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
