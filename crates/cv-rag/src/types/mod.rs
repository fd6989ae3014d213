//! Core types shared across the crate

pub mod document;

pub use document::{Chunk, Document, FileType, SourceFingerprint};
