//! Browser sessions and their conversation history

pub mod history;
pub mod store;

pub use history::{ChatEntry, ConversationHistory};
pub use store::{session_store, BrowserSession, ChatSession, ChatSessionStore, SESSION_COOKIE};
