//! In-memory vector index with a JSON snapshot on disk

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Snapshot file inside the persist directory
pub const SNAPSHOT_FILE: &str = "index.json";

const SNAPSHOT_VERSION: u32 = 1;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (-1.0 to 1.0, higher is better)
    pub similarity: f32,
}

/// Embedded chunks searchable by cosine similarity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    version: u32,
    /// Embedding model the vectors came from
    embed_model: String,
    /// Vector dimensions
    dimensions: usize,
    /// Build time
    created_at: DateTime<Utc>,
    /// Chunks with embeddings
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    /// Create an index from embedded chunks
    pub fn new(embed_model: impl Into<String>, chunks: Vec<Chunk>) -> Result<Self> {
        let dimensions = chunks.first().map(|c| c.embedding.len()).unwrap_or(0);
        let index = Self {
            version: SNAPSHOT_VERSION,
            embed_model: embed_model.into(),
            dimensions,
            created_at: Utc::now(),
            chunks,
        };
        index.validate().map_err(Error::index_build)?;
        Ok(index)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.version != SNAPSHOT_VERSION {
            return Err(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            ));
        }
        if self.chunks.is_empty() {
            return Err("index contains no chunks".to_string());
        }
        if self.dimensions == 0 {
            return Err("chunks have no embeddings".to_string());
        }
        if let Some(bad) = self.chunks.iter().find(|c| c.embedding.len() != self.dimensions) {
            return Err(format!(
                "chunk {} of {} has {} dimensions, expected {}",
                bad.chunk_index,
                bad.filename,
                bad.embedding.len(),
                self.dimensions
            ));
        }
        Ok(())
    }

    /// Embedding model name
    pub fn embed_model(&self) -> &str {
        &self.embed_model
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top-k chunks by cosine similarity, best first
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                similarity: cosine_similarity(query_embedding, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(top_k);
        results
    }

    /// Write the snapshot into `dir`, creating it if needed
    pub async fn save(&self, dir: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self)?;

        tokio::fs::create_dir_all(dir).await?;

        // Write-then-rename so a crash never leaves a half-written snapshot
        let tmp = dir.join(format!("{}.tmp", SNAPSHOT_FILE));
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, dir.join(SNAPSHOT_FILE)).await?;

        tracing::info!(
            "Persisted index ({} chunks) to {}",
            self.chunks.len(),
            dir.display()
        );
        Ok(())
    }

    /// Read a snapshot from `dir`
    pub async fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(SNAPSHOT_FILE);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Error::index_load(format!("{}: {}", path.display(), e)))?;

        let index: Self = serde_json::from_slice(&bytes)
            .map_err(|e| Error::index_load(format!("{}: {}", path.display(), e)))?;

        index
            .validate()
            .map_err(|e| Error::index_load(format!("{}: {}", path.display(), e)))?;

        Ok(index)
    }
}

/// Cosine similarity; zero when either vector is zero or lengths differ
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
