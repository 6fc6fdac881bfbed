//! Storage error types for bpflow-store.
//!
//! [`StoreError`] covers the failure modes of loading graph documents:
//! filesystem access, malformed JSON, invalid graph structure, and location
//! key conflicts.

use std::path::PathBuf;

use bpflow_core::CoreError;
use thiserror::Error;

/// Errors produced by graph loading and lookup.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a file or directory failed.
    #[error("io error on {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document parsed but does not form a valid graph.
    #[error("invalid graph: {0}")]
    Core(#[from] CoreError),

    /// Two documents claim the same location key.
    #[error("duplicate graph location: {location}")]
    DuplicateLocation { location: String },

    /// No graph is stored under the location key.
    #[error("graph not found: {location}")]
    NotFound { location: String },
}
