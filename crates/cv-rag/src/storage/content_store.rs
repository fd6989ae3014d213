//! Filesystem content directory holding uploaded documents

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// The content directory: one file per upload, named by original filename
#[derive(Debug, Clone)]
pub struct ContentStore {
    data_dir: PathBuf,
}

impl ContentStore {
    /// Create a store rooted at `data_dir` (created lazily on first save)
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Content directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write an uploaded document, overwriting a file of the same name
    pub async fn save(&self, data: &[u8], filename: &str) -> Result<PathBuf> {
        let name = sanitize_filename(filename)?;

        tokio::fs::create_dir_all(&self.data_dir).await.map_err(|e| {
            Error::storage(format!(
                "Failed to create content directory {}: {}",
                self.data_dir.display(),
                e
            ))
        })?;

        let path = self.data_dir.join(name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::storage(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!("Stored {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    /// List documents in the content directory, sorted by name
    ///
    /// A missing directory lists as empty. Hidden files and subdirectories
    /// are ignored.
    pub fn list_documents(&self) -> Result<Vec<PathBuf>> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.data_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                Error::storage(format!(
                    "Failed to list {}: {}",
                    self.data_dir.display(),
                    e
                ))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            paths.push(entry.into_path());
        }

        paths.sort();
        Ok(paths)
    }

    /// True when no documents have been uploaded
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.list_documents()?.is_empty())
    }
}

/// Reduce an uploaded filename to a bare file name
fn sanitize_filename(filename: &str) -> Result<String> {
    // Browsers on Windows may send full paths
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if last.is_empty() || last == "." || last == ".." {
        return Err(Error::storage(format!("Invalid filename: '{}'", filename)));
    }

    Ok(last.to_string())
}
