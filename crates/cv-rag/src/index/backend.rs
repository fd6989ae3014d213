//! Retrieval backend seam and the default vector backend

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::{ChunkingConfig, LlmConfig, RetrievalConfig};
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::types::{Chunk, Document};

use super::vector::VectorIndex;

/// Texts per embedding request
const EMBED_BATCH_SIZE: usize = 64;

/// A built or loaded index that can answer questions
#[async_trait]
pub trait IndexHandle: Send + Sync {
    /// Retrieve relevant passages and synthesize an answer
    async fn answer(&self, question: &str) -> Result<String>;

    /// Write the index to `location`
    async fn persist(&self, location: &Path) -> Result<()>;
}

/// Builds indexes from documents and loads persisted ones
///
/// Implementations:
/// - `VectorBackend`: chunk, embed and search with cosine similarity
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Build a fresh index over `documents`
    async fn build_index(&self, documents: &[Document]) -> Result<Arc<dyn IndexHandle>>;

    /// Load an index previously written by `IndexHandle::persist`
    async fn load_index(&self, location: &Path) -> Result<Arc<dyn IndexHandle>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Default backend: sentence chunking, hosted embeddings, hosted completion
pub struct VectorBackend {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    chunker: TextChunker,
    embed_model: String,
    top_k: usize,
}

impl VectorBackend {
    /// Create a backend from providers and configuration
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        chunking: &ChunkingConfig,
        retrieval: &RetrievalConfig,
        llm_config: &LlmConfig,
    ) -> Self {
        Self {
            embedder,
            llm,
            chunker: TextChunker::new(chunking.chunk_size, chunking.chunk_overlap),
            embed_model: llm_config.embed_model.clone(),
            top_k: retrieval.top_k.max(1),
        }
    }

    fn handle(&self, index: VectorIndex) -> Arc<dyn IndexHandle> {
        Arc::new(VectorIndexHandle {
            index,
            embedder: self.embedder.clone(),
            llm: self.llm.clone(),
            top_k: self.top_k,
        })
    }
}

#[async_trait]
impl RetrievalBackend for VectorBackend {
    async fn build_index(&self, documents: &[Document]) -> Result<Arc<dyn IndexHandle>> {
        let mut chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.chunker.chunk_document(doc))
            .collect();

        if chunks.is_empty() {
            return Err(Error::index_build(
                "No text could be extracted from the documents",
            ));
        }

        tracing::info!(
            "Embedding {} chunks from {} documents with {}",
            chunks.len(),
            documents.len(),
            self.embedder.name()
        );

        for batch in chunks.chunks_mut(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }
        }

        let index = VectorIndex::new(self.embed_model.clone(), chunks)?;
        Ok(self.handle(index))
    }

    async fn load_index(&self, location: &Path) -> Result<Arc<dyn IndexHandle>> {
        let index = VectorIndex::load(location).await?;

        if index.embed_model() != self.embed_model {
            return Err(Error::index_load(format!(
                "snapshot was built with embedding model '{}' but '{}' is configured",
                index.embed_model(),
                self.embed_model
            )));
        }

        tracing::info!("Loaded index with {} chunks", index.len());
        Ok(self.handle(index))
    }

    fn name(&self) -> &str {
        "vector"
    }
}

struct VectorIndexHandle {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

#[async_trait]
impl IndexHandle for VectorIndexHandle {
    async fn answer(&self, question: &str) -> Result<String> {
        let query_embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&query_embedding, self.top_k);

        tracing::debug!(
            "Retrieved {} passages (best similarity {:?}), answering with {}",
            results.len(),
            results.first().map(|r| r.similarity),
            self.llm.name()
        );

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);

        self.llm.complete(&prompt).await
    }

    async fn persist(&self, location: &Path) -> Result<()> {
        self.index.save(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileType;
    use parking_lot::Mutex;
    use uuid::Uuid;

    /// Embeds by keyword presence so retrieval is predictable
    struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let text = text.to_lowercase();
            Ok(vec![
                if text.contains("job") || text.contains("engineer") { 1.0 } else { 0.0 },
                if text.contains("degree") || text.contains("university") { 1.0 } else { 0.0 },
                0.1,
            ])
        }

        fn name(&self) -> &str {
            "keyword"
        }
    }

    #[derive(Default)]
    struct RecordingLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().push(prompt.to_string());
            Ok("Staff Engineer".to_string())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn document(filename: &str, content: &str) -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            path: filename.into(),
            file_type: FileType::Txt,
            content: content.to_string(),
            content_hash: crate::ingestion::hash_bytes(content.as_bytes()),
            total_pages: None,
        }
    }

    fn backend(llm: Arc<RecordingLlm>) -> VectorBackend {
        let chunking = ChunkingConfig {
            chunk_size: 60,
            chunk_overlap: 0,
        };
        VectorBackend::new(
            Arc::new(KeywordEmbedder),
            llm,
            &chunking,
            &RetrievalConfig { top_k: 1 },
            &LlmConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_build_and_answer_uses_best_passage() {
        let llm = Arc::new(RecordingLlm::default());
        let backend = backend(llm.clone());

        let doc = document(
            "resume.txt",
            "Graduated from the university with a physics degree in 2012. \
             Most recent job: Staff Engineer at Acme Corp since 2021.",
        );
        let handle = backend.build_index(&[doc]).await.unwrap();

        let answer = handle
            .answer("What is the candidate's most recent job title?")
            .await
            .unwrap();
        assert_eq!(answer, "Staff Engineer");

        let prompts = llm.prompts.lock();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Acme"));
        assert!(prompts[0].contains("Query: What is the candidate's most recent job title?"));
    }

    #[tokio::test]
    async fn test_build_without_text_fails() {
        let backend = backend(Arc::new(RecordingLlm::default()));
        let err = backend
            .build_index(&[document("scan.pdf", "   ")])
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::IndexBuild(_)));
    }

    #[tokio::test]
    async fn test_persist_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = backend(Arc::new(RecordingLlm::default()));

        let handle = backend
            .build_index(&[document("resume.txt", "Staff Engineer at Acme Corp since 2021.")])
            .await
            .unwrap();
        handle.persist(tmp.path()).await.unwrap();

        let loaded = backend.load_index(tmp.path()).await.unwrap();
        assert_eq!(loaded.answer("job?").await.unwrap(), "Staff Engineer");
    }

    #[tokio::test]
    async fn test_load_rejects_other_embed_model() {
        let tmp = tempfile::tempdir().unwrap();
        let mut chunk = Chunk::new("cv.txt".into(), "text".into(), None, 0, 4, 0);
        chunk.embedding = vec![1.0];
        VectorIndex::new("some-other-model", vec![chunk])
            .unwrap()
            .save(tmp.path())
            .await
            .unwrap();

        let backend = backend(Arc::new(RecordingLlm::default()));
        let err = backend.load_index(tmp.path()).await.err().unwrap();
        assert!(matches!(err, Error::IndexLoad(_)));
    }
}
