//! Configuration for the CV chatbot

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CV_RAG_CONFIG";

/// Default config file, read only if present
pub const DEFAULT_CONFIG_FILE: &str = "cv-rag.toml";

/// Session lifetime when none is configured
const DEFAULT_SESSION_LIFETIME_MINS: i64 = 60;

/// API key variables, checked in order
const API_KEY_ENV_VARS: &[&str] = &["OpenAI_Key", "OPENAI_API_KEY"];

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Content and snapshot directories
    pub storage: StorageConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Hosted LLM configuration
    pub llm: LlmConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Index lifecycle configuration
    pub index: IndexConfig,
}

impl RagConfig {
    /// Load configuration: optional TOML file, then environment overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a `.env` file into the process environment
    ///
    /// With no path, `.env` is searched for from the working directory up.
    /// Variables that are already set win over the file. Returns the file
    /// that was read, or `None` when there is none.
    pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>> {
        let loaded = match path {
            Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
            None => dotenvy::dotenv(),
        };

        match loaded {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(Error::Config(format!("Invalid .env file: {}", e))),
        }
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
        {
            self.llm.api_key = Some(key);
        }

        if let Some(host) = lookup("CV_RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CV_RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid CV_RAG_PORT '{}': {}", port, e)))?;
        }
        if let Some(dir) = lookup("CV_RAG_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("CV_RAG_STORAGE_DIR") {
            self.storage.persist_dir = PathBuf::from(dir);
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes; `None` leaves uploads unbounded
    pub max_upload_size: Option<usize>,
    /// Idle minutes before a browser session and its history are dropped
    pub session_lifetime_mins: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            max_upload_size: None,
            session_lifetime_mins: DEFAULT_SESSION_LIFETIME_MINS,
        }
    }
}

/// Where documents and the index snapshot live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Content directory for uploaded documents
    pub data_dir: PathBuf,
    /// Persisted index directory
    pub persist_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            persist_dir: PathBuf::from("./storage"),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 200,
        }
    }
}

/// Hosted LLM configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key, normally injected from the environment
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Chat completion model
    pub chat_model: String,
    /// Embedding model
    pub embed_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
    /// Retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            chat_model: "gpt-3.5-turbo".to_string(),
            embed_model: "text-embedding-ada-002".to_string(),
            temperature: 0.1,
            timeout_secs: None,
            max_retries: 0,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the LLM per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 2 }
    }
}

/// Index lifecycle configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// What to do when the snapshot no longer matches the content directory
    pub stale_policy: StalePolicy,
}

/// Handling of a persisted snapshot that predates later uploads
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StalePolicy {
    /// Re-index when the snapshot manifest differs from the content directory
    #[default]
    Rebuild,
    /// Always serve the snapshot as loaded
    Keep,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(config.storage.persist_dir, PathBuf::from("./storage"));
        assert_eq!(config.llm.max_retries, 0);
        assert!(config.llm.timeout_secs.is_none());
        assert_eq!(config.index.stale_policy, StalePolicy::Rebuild);
        assert_eq!(config.server.session_lifetime_mins, 60);
    }

    #[test]
    fn test_dotenv_file_feeds_environment() {
        let tmp = tempfile::tempdir().unwrap();
        let env_file = tmp.path().join(".env");
        std::fs::write(&env_file, "CV_RAG_DOTENV_TEST_KEY=sk-from-file\n").unwrap();

        let loaded = RagConfig::load_dotenv(Some(&env_file)).unwrap();
        assert_eq!(loaded.as_deref(), Some(env_file.as_path()));

        let value = std::env::var("CV_RAG_DOTENV_TEST_KEY").unwrap();
        assert_eq!(value, "sk-from-file");
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = RagConfig::load_dotenv(Some(&tmp.path().join(".env"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_api_key_precedence() {
        let mut config = RagConfig::default();
        config
            .apply_env(lookup(&[("OpenAI_Key", "sk-first"), ("OPENAI_API_KEY", "sk-second")]))
            .unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-first"));

        let mut config = RagConfig::default();
        config
            .apply_env(lookup(&[("OpenAI_Key", "  "), ("OPENAI_API_KEY", "sk-second")]))
            .unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-second"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RagConfig::default();
        config
            .apply_env(lookup(&[
                ("CV_RAG_PORT", "9000"),
                ("CV_RAG_DATA_DIR", "/tmp/cvs"),
            ]))
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/cvs"));

        let mut config = RagConfig::default();
        assert!(config.apply_env(lookup(&[("CV_RAG_PORT", "http")])).is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: RagConfig = toml::from_str(
            r#"
            [index]
            stale_policy = "keep"

            [retrieval]
            top_k = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.index.stale_policy, StalePolicy::Keep);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.chunking.chunk_size, 1024);
    }
}
