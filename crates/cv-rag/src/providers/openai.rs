//! OpenAI-compatible client for embeddings and chat completions

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Backoff stops doubling after this many attempts (64s)
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Delay before retry number `attempt + 1`
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(MAX_BACKOFF_EXPONENT))
}

/// Hosted LLM client
///
/// The API key is checked on every call rather than at construction, so a
/// missing key surfaces on the first request instead of stopping startup.
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let mut builder = Client::builder().pool_max_idle_per_host(5);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.config.api_key.as_deref().ok_or_else(|| {
            Error::Config(
                "OpenAI API key is not set. Export OpenAI_Key (or OPENAI_API_KEY) and restart."
                    .to_string(),
            )
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                // A bad key won't get better on retry
                Err(e @ Error::Config(_)) => return Err(e),
                Err(e) if attempt >= max_retries => return Err(e),
                Err(e) => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}, retrying in {:?}",
                        attempt + 1,
                        max_retries.saturating_add(1),
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// POST a JSON body and decode the JSON reply
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let key = self.api_key()?;

        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Config(
                "OpenAI API key was rejected (HTTP 401). Check OpenAI_Key.".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!("{} failed: HTTP {} - {}", path, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse {} response: {}", path, e)))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::embedding("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            model: &self.config.embed_model,
            input: texts,
        };

        let response: EmbedResponse = self
            .retry_request(|| self.post_json("embeddings", &request))
            .await
            .map_err(|e| match e {
                Error::Llm(msg) => Error::embedding(msg),
                other => other,
            })?;

        if response.data.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::info!("Generating answer with model: {}", self.config.chat_model);

        let request = ChatRequest {
            model: &self.config.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response: ChatResponse = self
            .retry_request(|| self.post_json("chat/completions", &request))
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::llm("Completion returned no content"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
