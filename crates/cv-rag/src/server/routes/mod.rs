//! Page routes for the chat UI

pub mod chat;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all page routes
///
/// Uploads have no body limit unless `max_upload_size` is configured.
pub fn page_routes(max_upload_size: Option<usize>) -> Router<AppState> {
    let upload_limit = match max_upload_size {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(chat::show_page))
        .route("/upload", post(upload::upload_cv).layer(upload_limit))
        .route("/ask", post(chat::ask))
        .route("/clear", post(chat::clear))
}
