//! Document ingestion: reading the content directory, parsing, chunking

mod chunker;
mod parser;
mod reader;

pub use chunker::TextChunker;
pub use parser::{FileParser, ParsedDocument};
pub use reader::{hash_bytes, DirectoryContents, DirectoryReader, SkippedFile};
