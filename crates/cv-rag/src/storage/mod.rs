//! Durable storage for uploaded documents

mod content_store;

pub use content_store::ContentStore;
