//! Ask, clear and page display

use axum::{extract::State, response::Response, Form};
use serde::Deserialize;

use crate::server::page::Banner;
use crate::server::state::AppState;
use crate::session::{BrowserSession, ChatSession};

/// Shown when a question arrives before any upload in this session
pub const UPLOAD_FIRST: &str = "Please upload a CV before asking questions.";

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// GET / - render the page
pub async fn show_page(State(state): State<AppState>, session: BrowserSession) -> Response {
    let chat = ChatSession::load(&session);
    state.pages().respond(&chat, &[])
}

/// POST /ask - answer a question about the uploaded CV
pub async fn ask(
    State(state): State<AppState>,
    session: BrowserSession,
    Form(form): Form<AskForm>,
) -> Response {
    let mut chat = ChatSession::load(&session);
    let mut banners = Vec::new();

    if !form.question.is_empty() {
        match chat.file_path.clone() {
            Some(path) => match state.query().answer(&path, &form.question).await {
                Ok(answer) => {
                    chat.history.push(form.question.as_str(), answer);
                    chat.save(&session);
                }
                Err(e) => {
                    tracing::error!("Question failed: {}", e);
                    banners.push(Banner::error(format!("Error: {}", e)));
                }
            },
            None => banners.push(Banner::warning(UPLOAD_FIRST)),
        }
    }

    state.pages().respond(&chat, &banners)
}

/// POST /clear - empty this session's history
pub async fn clear(State(state): State<AppState>, session: BrowserSession) -> Response {
    let mut chat = ChatSession::load(&session);
    chat.history.clear();
    chat.save(&session);

    state.pages().respond(&chat, &[])
}
