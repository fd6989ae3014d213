//! cv-rag: upload a CV as PDF and ask questions about it
//!
//! Uploaded documents are stored in a content directory, indexed by a
//! pluggable retrieval backend, and queried through a server-rendered chat
//! page. The index is persisted to disk and reloaded on restart.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod query;
pub mod server;
pub mod session;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use index::{IndexHandle, IndexManager, RebuildReport, RetrievalBackend};
pub use query::QueryService;
