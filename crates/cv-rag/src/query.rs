//! Answers questions about an uploaded CV

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::index::IndexManager;

/// Query service over the manager's live index
#[derive(Clone)]
pub struct QueryService {
    index: Arc<IndexManager>,
}

impl QueryService {
    pub fn new(index: Arc<IndexManager>) -> Self {
        Self { index }
    }

    /// Answer `question` for the CV stored at `file_path`
    ///
    /// The file is only checked for existence; retrieval runs against the
    /// whole live index.
    pub async fn answer(&self, file_path: &Path, question: &str) -> Result<String> {
        if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
            return Err(Error::NotFound(file_path.display().to_string()));
        }

        let index = self.index.current().ok_or(Error::NotReady)?;

        tracing::info!("Answering question for {}", file_path.display());
        index.answer(question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StalePolicy;
    use crate::index::{IndexHandle, RetrievalBackend};
    use crate::storage::ContentStore;
    use crate::types::Document;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoHandle {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IndexHandle for EchoHandle {
        async fn answer(&self, question: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("  answer to: {}\n", question))
        }

        async fn persist(&self, location: &Path) -> Result<()> {
            std::fs::create_dir_all(location)?;
            Ok(())
        }
    }

    struct EchoBackend {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RetrievalBackend for EchoBackend {
        async fn build_index(&self, _documents: &[Document]) -> Result<Arc<dyn IndexHandle>> {
            Ok(Arc::new(EchoHandle {
                calls: self.calls.clone(),
            }))
        }

        async fn load_index(&self, _location: &Path) -> Result<Arc<dyn IndexHandle>> {
            Err(Error::index_load("no snapshot"))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn service(tmp: &tempfile::TempDir) -> (QueryService, Arc<IndexManager>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = Arc::new(IndexManager::new(
            ContentStore::new(tmp.path().join("data")),
            tmp.path().join("storage"),
            Arc::new(EchoBackend {
                calls: calls.clone(),
            }),
            StalePolicy::Keep,
        ));
        (QueryService::new(manager.clone()), manager, calls)
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found_regardless_of_index() {
        let tmp = tempfile::tempdir().unwrap();
        let (service, manager, calls) = service(&tmp);
        let missing = tmp.path().join("data/gone.pdf");

        let err = service.answer(&missing, "q").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref p) if p.ends_with("gone.pdf")));

        std::fs::create_dir_all(tmp.path().join("data")).unwrap();
        std::fs::write(tmp.path().join("data/cv.txt"), "Staff Engineer").unwrap();
        manager.rebuild().await;
        assert!(manager.is_ready());

        let err = service.answer(&missing, "q").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_existing_file_without_index_is_not_ready() {
        let tmp = tempfile::tempdir().unwrap();
        let (service, _manager, _calls) = service(&tmp);
        let cv = tmp.path().join("resume.pdf");
        std::fs::write(&cv, b"%PDF-1.4").unwrap();

        let err = service.answer(&cv, "q").await.unwrap_err();
        assert!(matches!(err, Error::NotReady));
    }

    #[tokio::test]
    async fn test_answer_passes_through_unmodified() {
        let tmp = tempfile::tempdir().unwrap();
        let (service, manager, calls) = service(&tmp);
        std::fs::create_dir_all(tmp.path().join("data")).unwrap();
        let cv = tmp.path().join("data/cv.txt");
        std::fs::write(&cv, "Staff Engineer").unwrap();
        manager.rebuild().await;

        let answer = service.answer(&cv, "Title?").await.unwrap();
        assert_eq!(answer, "  answer to: Title?\n");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
