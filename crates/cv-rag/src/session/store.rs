//! Cookie-keyed in-memory sessions
//!
//! Sessions live in axum_session's memory store without a database pool.
//! Idle sessions expire after the configured lifetime and are purged.

use axum_session::{Session, SessionConfig, SessionNullPool, SessionStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::history::ConversationHistory;
use crate::error::{Error, Result};

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "cv_rag_session";

/// Session key holding the chat state
const CHAT_KEY: &str = "chat";

/// Memory-only session store
pub type ChatSessionStore = SessionStore<SessionNullPool>;

/// Per-request session handle
pub type BrowserSession = Session<SessionNullPool>;

/// Chat state of one browser session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSession {
    pub history: ConversationHistory,
    /// Path of the last CV stored by this session
    pub file_path: Option<PathBuf>,
}

impl ChatSession {
    /// Chat state for a session; empty when nothing was saved yet
    pub fn load(session: &BrowserSession) -> Self {
        session.get(CHAT_KEY).unwrap_or_default()
    }

    /// Write the chat state back into the session
    pub fn save(&self, session: &BrowserSession) {
        session.set(CHAT_KEY, self);
    }
}

fn session_config(lifetime_mins: i64) -> SessionConfig {
    let lifetime = chrono::Duration::minutes(lifetime_mins.max(1));
    SessionConfig::default()
        .with_session_name(SESSION_COOKIE)
        .with_secure(false)
        .with_lifetime(lifetime)
        .with_memory_lifetime(lifetime)
}

/// Build the session store; nothing is persisted
pub async fn session_store(lifetime_mins: i64) -> Result<ChatSessionStore> {
    SessionStore::new(None, session_config(lifetime_mins))
        .await
        .map_err(|e| Error::internal(format!("Failed to create session store: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_session_survives_serialization() {
        let mut chat = ChatSession::default();
        chat.history.push("Title?", "Staff Engineer");
        chat.file_path = Some(PathBuf::from("./data/resume.pdf"));

        let value = serde_json::to_value(&chat).unwrap();
        let restored: ChatSession = serde_json::from_value(value).unwrap();

        assert_eq!(restored.history.entries()[0].answer, "Staff Engineer");
        assert_eq!(restored.file_path, chat.file_path);
    }

    #[tokio::test]
    async fn test_store_builds_without_a_pool() {
        let store = session_store(0).await;
        assert!(store.is_ok());
    }
}
