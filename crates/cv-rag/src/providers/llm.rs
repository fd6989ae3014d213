//! LLM provider trait for answer synthesis

use async_trait::async_trait;
use crate::error::Result;

/// Trait for single-turn text completion
///
/// Implementations:
/// - `OpenAiClient`: hosted OpenAI-compatible `/chat/completions` endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully built prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
