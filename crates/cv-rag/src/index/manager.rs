//! Owns the live index and decides between loading and building it

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::StalePolicy;
use crate::error::{Error, Result};
use crate::ingestion::DirectoryReader;
use crate::storage::ContentStore;
use crate::types::SourceFingerprint;

use super::backend::{IndexHandle, RetrievalBackend};
use super::report::RebuildReport;

/// Manifest file inside the persist directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Shown whenever a rebuild ends without a live index
pub const NOT_INITIALIZED: &str =
    "Index has not been initialized. Please check the data directory or persisted storage.";

/// Sources the persisted snapshot was built from
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    built_at: DateTime<Utc>,
    sources: Vec<SourceFingerprint>,
}

/// Index lifecycle manager
///
/// Holds the single live index for the process. Readers clone the `Arc`
/// under a short read lock; rebuilds are serialized by `rebuild_lock`.
pub struct IndexManager {
    store: ContentStore,
    persist_dir: PathBuf,
    backend: Arc<dyn RetrievalBackend>,
    stale_policy: StalePolicy,
    live: RwLock<Option<Arc<dyn IndexHandle>>>,
    rebuild_lock: Mutex<()>,
}

impl IndexManager {
    /// Create a manager with no live index
    pub fn new(
        store: ContentStore,
        persist_dir: impl Into<PathBuf>,
        backend: Arc<dyn RetrievalBackend>,
        stale_policy: StalePolicy,
    ) -> Self {
        Self {
            store,
            persist_dir: persist_dir.into(),
            backend,
            stale_policy,
            live: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// The live index, if any
    pub fn current(&self) -> Option<Arc<dyn IndexHandle>> {
        self.live.read().clone()
    }

    /// Whether a live index exists
    pub fn is_ready(&self) -> bool {
        self.live.read().is_some()
    }

    /// Whether a persisted snapshot directory exists
    pub fn has_persisted_state(&self) -> bool {
        self.persist_dir.exists()
    }

    fn set_live(&self, handle: Option<Arc<dyn IndexHandle>>) {
        *self.live.write() = handle;
    }

    /// Bring the live index in line with the content directory and snapshot
    pub async fn rebuild(&self) -> RebuildReport {
        let _guard = self.rebuild_lock.lock().await;
        let mut report = RebuildReport::default();

        tracing::info!(
            "Rebuilding index (backend: {}, data: {}, storage: {})",
            self.backend.name(),
            self.store.data_dir().display(),
            self.persist_dir.display()
        );

        match self.store.is_empty() {
            Ok(true) => self.rebuild_from_snapshot_only(&mut report).await,
            Ok(false) => self.rebuild_with_documents(&mut report).await,
            Err(e) => report.error(e.to_string()),
        }

        report.ready = self.is_ready();
        if report.ready {
            report.success("Index is initialized and ready for use.");
        } else {
            report.error(NOT_INITIALIZED);
        }
        report
    }

    async fn rebuild_from_snapshot_only(&self, report: &mut RebuildReport) {
        report.info("Data directory is empty. No files to index.");

        if self.has_persisted_state() {
            report.info("Loading index from persisted storage.");
            match self.backend.load_index(&self.persist_dir).await {
                Ok(handle) => {
                    self.set_live(Some(handle));
                    report.success("Index successfully loaded from persisted storage.");
                }
                Err(e) => report.error(e.to_string()),
            }
        } else {
            report.info("No index found in persisted storage.");
            self.set_live(None);
        }
    }

    async fn rebuild_with_documents(&self, report: &mut RebuildReport) {
        report.info("Data directory is not empty. Creating or loading the index.");

        if !self.has_persisted_state() {
            if let Err(e) = self.build_and_persist(report).await {
                report.error(e.to_string());
            }
            return;
        }

        report.info("Attempting to load existing index from persisted storage.");

        if self.stale_policy == StalePolicy::Rebuild {
            match self.snapshot_is_stale().await {
                Ok(true) => {
                    report.info(
                        "Persisted index does not match the data directory. Rebuilding the index.",
                    );
                    if let Err(e) = self.build_and_persist(report).await {
                        report.error(e.to_string());
                    }
                    return;
                }
                Ok(false) => {}
                Err(e) => tracing::warn!("Could not compare snapshot with data directory: {}", e),
            }
        }

        match self.backend.load_index(&self.persist_dir).await {
            Ok(handle) => {
                self.set_live(Some(handle));
                report.success("Index successfully loaded from storage.");
            }
            Err(e) => {
                report.error(e.to_string());
                if self.stale_policy == StalePolicy::Rebuild {
                    report.info("Rebuilding the index from the data directory.");
                    if let Err(e) = self.build_and_persist(report).await {
                        report.error(e.to_string());
                    }
                }
            }
        }
    }

    /// Read every document, build a fresh index and persist it
    async fn build_and_persist(&self, report: &mut RebuildReport) -> Result<()> {
        let store = self.store.clone();
        let contents = tokio::task::spawn_blocking(move || DirectoryReader::read_all(&store))
            .await
            .map_err(|e| Error::internal(format!("Document reader task failed: {}", e)))??;

        for skipped in &contents.skipped {
            report.info(format!("Skipped {}: {}", skipped.filename, skipped.error));
        }

        if contents.documents.is_empty() {
            return Err(Error::index_build(
                "No readable documents in the data directory",
            ));
        }

        let handle = self
            .backend
            .build_index(&contents.documents)
            .await
            .map_err(|e| match e {
                e @ (Error::IndexBuild(_) | Error::Config(_)) => e,
                other => Error::index_build(other.to_string()),
            })?;
        self.set_live(Some(handle.clone()));

        match self.persist(handle.as_ref(), contents.sources).await {
            Ok(()) => report.success("Index created and persisted."),
            Err(e) => report.error(format!("Index created but could not be persisted: {}", e)),
        }
        Ok(())
    }

    async fn persist(&self, handle: &dyn IndexHandle, sources: Vec<SourceFingerprint>) -> Result<()> {
        handle.persist(&self.persist_dir).await?;

        let manifest = Manifest {
            built_at: Utc::now(),
            sources,
        };
        tokio::fs::write(
            self.persist_dir.join(MANIFEST_FILE),
            serde_json::to_vec_pretty(&manifest)?,
        )
        .await?;
        Ok(())
    }

    /// Snapshot manifest missing or different from the content directory
    async fn snapshot_is_stale(&self) -> Result<bool> {
        let store = self.store.clone();
        let current = tokio::task::spawn_blocking(move || DirectoryReader::fingerprints(&store))
            .await
            .map_err(|e| Error::internal(format!("Fingerprint task failed: {}", e)))??;

        let raw = match tokio::fs::read(self.persist_dir.join(MANIFEST_FILE)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        let stale = match serde_json::from_slice::<Manifest>(&raw) {
            Ok(mut manifest) => {
                manifest.sources.sort();
                manifest.sources != current
            }
            Err(_) => true,
        };
        Ok(stale)
    }
}
