//! HTTP server for the CV chatbot

pub mod page;
pub mod routes;
pub mod state;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use axum_session::SessionLayer;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::index::RetrievalBackend;
use state::AppState;

/// CV chatbot HTTP server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new server around a retrieval backend
    pub async fn new(config: RagConfig, backend: Arc<dyn RetrievalBackend>) -> Result<Self> {
        let state = AppState::new(config.clone(), backend).await?;
        Ok(Self { config, state })
    }

    /// Shared state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Router with all routes and middleware
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Load or build the index, then serve until shutdown
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        // Make a persisted snapshot live before the first request
        let report = self.state.index().rebuild().await;
        if !report.ready {
            tracing::warn!("Starting without a live index; upload a CV to build one");
        }

        let router = self.router();

        tracing::info!("Starting CV chatbot on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router for a state
pub fn build_router(state: AppState) -> Router {
    let max_upload_size = state.config().server.max_upload_size;
    let sessions = state.sessions().clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .merge(routes::page_routes(max_upload_size))
        .with_state(state)
        .layer(SessionLayer::new(sessions))
        // Middleware layers (order matters - applied bottom to top)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
