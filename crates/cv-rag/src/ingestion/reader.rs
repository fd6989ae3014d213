//! Reads every document in the content directory

use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::storage::ContentStore;
use crate::types::{Document, SourceFingerprint};

use super::parser::{guard_extraction, FileParser, ParsedDocument};

/// A file the reader could not turn into a document
#[derive(Debug)]
pub struct SkippedFile {
    /// Filename inside the content directory
    pub filename: String,
    /// Why it was skipped
    pub error: Error,
}

/// Result of reading the content directory
#[derive(Debug, Default)]
pub struct DirectoryContents {
    /// Successfully parsed documents, sorted by filename
    pub documents: Vec<Document>,
    /// Files that could not be read or parsed
    pub skipped: Vec<SkippedFile>,
    /// Fingerprint of every file read, parsed or not, sorted
    pub sources: Vec<SourceFingerprint>,
}

/// Content-directory reader
pub struct DirectoryReader;

impl DirectoryReader {
    /// Read and parse every document in the store
    pub fn read_all(store: &ContentStore) -> Result<DirectoryContents> {
        Self::read_all_with(store, FileParser::parse)
    }

    /// Read every document with a given parser
    ///
    /// Each file is read once; its fingerprint and its parse come from the
    /// same bytes. A parser panic skips the file like any parse error.
    pub fn read_all_with<P>(store: &ContentStore, parse: P) -> Result<DirectoryContents>
    where
        P: Fn(&str, &[u8]) -> Result<ParsedDocument>,
    {
        let mut contents = DirectoryContents::default();

        for path in store.list_documents()? {
            let filename = file_name(&path);
            let data = match std::fs::read(&path) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", filename, e);
                    contents.skipped.push(SkippedFile {
                        filename,
                        error: e.into(),
                    });
                    continue;
                }
            };

            let content_hash = hash_bytes(&data);
            contents.sources.push(SourceFingerprint {
                filename: filename.clone(),
                content_hash: content_hash.clone(),
            });

            match guard_extraction(&filename, || parse(&filename, &data)) {
                Ok(parsed) => contents.documents.push(Document {
                    id: Uuid::new_v4(),
                    filename,
                    path,
                    file_type: parsed.file_type,
                    content: parsed.content,
                    content_hash,
                    total_pages: parsed.total_pages,
                }),
                Err(error) => {
                    tracing::warn!("Skipping {}: {}", filename, error);
                    contents.skipped.push(SkippedFile { filename, error });
                }
            }
        }

        contents.sources.sort();
        Ok(contents)
    }

    /// Fingerprint every file in the store, parseable or not
    pub fn fingerprints(store: &ContentStore) -> Result<Vec<SourceFingerprint>> {
        let mut fingerprints = Vec::new();
        for path in store.list_documents()? {
            let data = std::fs::read(&path)?;
            fingerprints.push(SourceFingerprint {
                filename: file_name(&path),
                content_hash: hash_bytes(&data),
            });
        }
        fingerprints.sort();
        Ok(fingerprints)
    }
}

/// SHA-256 of raw bytes, hex encoded
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
