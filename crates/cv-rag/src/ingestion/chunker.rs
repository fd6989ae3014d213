//! Text chunking with position tracking

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Chunk, Document};

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in bytes
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum size for a chunk closed mid-document
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap: overlap.min(chunk_size / 2),
            min_size: 50,
        }
    }

    /// Chunk a document's extracted text
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let page_number = doc.total_pages.map(|_| 1);
        let mut chunks = Vec::new();

        let mut current_chunk = String::new();
        let mut current_start = 0usize;
        let mut chunk_index = 0u32;
        let mut char_pos = 0usize;

        for sentence in doc.content.split_sentence_bounds() {
            let sentence_len = sentence.len();

            // If adding this sentence exceeds chunk size, save current chunk.
            // Pieces below min_size are carried into the next chunk instead.
            if current_chunk.trim().len() >= self.min_size
                && current_chunk.len() + sentence_len > self.chunk_size
            {
                chunks.push(Chunk::new(
                    doc.filename.clone(),
                    current_chunk.trim().to_string(),
                    page_number,
                    current_start,
                    char_pos,
                    chunk_index,
                ));
                chunk_index += 1;

                // Start new chunk with overlap
                current_chunk = self.get_overlap_text(&current_chunk);
                current_start = char_pos.saturating_sub(current_chunk.len());
            }

            current_chunk.push_str(sentence);
            char_pos += sentence_len;
        }

        // Short documents (a one-line CV) still produce their single chunk
        if !current_chunk.trim().is_empty() {
            chunks.push(Chunk::new(
                doc.filename.clone(),
                current_chunk.trim().to_string(),
                page_number,
                current_start,
                char_pos,
                chunk_index,
            ));
        }

        chunks
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);

        // Ensure we're at a valid UTF-8 character boundary
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let overlap_text = &text[start..];

        // Try to start at a sentence boundary
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileType;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn doc(content: &str) -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: "resume.txt".to_string(),
            path: PathBuf::from("data/resume.txt"),
            file_type: FileType::Txt,
            content: content.to_string(),
            content_hash: String::new(),
            total_pages: None,
        }
    }

    #[test]
    fn test_short_document_single_chunk() {
        let chunker = TextChunker::new(1024, 200);
        let chunks = chunker.chunk_document(&doc("Jane Doe. Staff Engineer."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Jane Doe. Staff Engineer.");
        assert_eq!(chunks[0].filename, "resume.txt");
    }

    #[test]
    fn test_long_document_splits_in_order() {
        let sentence = "Led a team of engineers building payment systems at Acme Corp. ";
        let text = sentence.repeat(40);
        let chunker = TextChunker::new(300, 60);
        let chunks = chunker.chunk_document(&doc(&text));

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert!(chunk.content.len() <= 300 + sentence.len());
        }
    }

    #[test]
    fn test_short_leading_piece_is_kept() {
        let long = format!("Experience: {}.", "distributed systems and payments ".repeat(5));
        let text = format!("Jane Doe. {}", long);
        let chunker = TextChunker::new(100, 0);
        let chunks = chunker.chunk_document(&doc(&text));

        assert!(chunks[0].content.starts_with("Jane Doe."));
        let joined: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert!(joined.contains("Jane Doe."));
        assert!(joined.contains("payments"));
    }

    #[test]
    fn test_empty_document_no_chunks() {
        let chunker = TextChunker::new(1024, 200);
        assert!(chunker.chunk_document(&doc("   \n ")).is_empty());
    }

    #[test]
    fn test_overlap_respects_char_boundary() {
        let chunker = TextChunker::new(20, 7);
        let overlap = chunker.get_overlap_text("Développeur séniör à Zürich");
        assert!(!overlap.is_empty());
    }
}
