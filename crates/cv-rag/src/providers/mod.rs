//! Provider abstractions for embeddings and answer synthesis
//!
//! The index backend only talks to these traits, so the hosted API can be
//! swapped for any compatible service (or a fake in tests).

pub mod embedding;
pub mod llm;
pub mod openai;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use openai::OpenAiClient;
