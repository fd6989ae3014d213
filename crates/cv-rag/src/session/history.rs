//! Per-session question and answer transcript

use serde::{Deserialize, Serialize};

/// One question and its answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
    pub question: String,
    pub answer: String,
}

/// Append-only transcript, cleared only on request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    entries: Vec<ChatEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; question and answer are stored as given
    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.entries.push(ChatEntry {
            question: question.into(),
            answer: answer.into(),
        });
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order_and_text() {
        let mut history = ConversationHistory::new();
        history.push("  Where did they study? ", "MIT");
        history.push("Title?", "Staff Engineer");

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].question, "  Where did they study? ");
        assert_eq!(history.entries()[1].answer, "Staff Engineer");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut history = ConversationHistory::new();
        history.push("q", "a");

        history.clear();
        assert!(history.is_empty());
        history.clear();
        assert!(history.is_empty());
    }
}
