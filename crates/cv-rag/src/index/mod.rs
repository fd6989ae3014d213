//! Search index: backend seam, vector implementation and lifecycle

pub mod backend;
pub mod manager;
pub mod report;
pub mod vector;

pub use backend::{IndexHandle, RetrievalBackend, VectorBackend};
pub use manager::IndexManager;
pub use report::{RebuildReport, ReportLevel, ReportLine};
pub use vector::{SearchResult, VectorIndex};
