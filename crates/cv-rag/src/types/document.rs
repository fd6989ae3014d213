//! Document and chunk types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// File types the content-directory reader understands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// HTML document
    Html,
    /// CSV file
    Csv,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            "csv" => Self::Csv,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a filename
    pub fn from_filename(filename: &str) -> Self {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unknown,
        }
    }
}

/// A source document read from the content directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID (per read, not stable across rebuilds)
    pub id: Uuid,
    /// Filename inside the content directory
    pub filename: String,
    /// Full path the document was read from
    pub path: PathBuf,
    /// File type
    pub file_type: FileType,
    /// Extracted text
    pub content: String,
    /// SHA-256 of the raw file bytes
    pub content_hash: String,
    /// Total number of pages (if applicable)
    pub total_pages: Option<u32>,
}

/// Manifest entry identifying one indexed source document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFingerprint {
    /// Filename inside the content directory
    pub filename: String,
    /// SHA-256 of the raw file bytes
    pub content_hash: String,
}

/// A chunk of text from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Source filename
    pub filename: String,
    /// Text content
    pub content: String,
    /// Embedding vector
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// Page number (1-indexed, for paginated formats)
    pub page_number: Option<u32>,
    /// Character position in original document
    pub char_start: usize,
    pub char_end: usize,
    /// Chunk index within document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(
        filename: String,
        content: String,
        page_number: Option<u32>,
        char_start: usize,
        char_end: usize,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            content,
            embedding: Vec::new(),
            page_number,
            char_start,
            char_end,
            chunk_index,
        }
    }

    /// Format the chunk's origin for prompts and logs
    pub fn source_label(&self) -> String {
        match self.page_number {
            Some(page) => format!("{}, Page {}", self.filename, page),
            None => self.filename.clone(),
        }
    }
}
