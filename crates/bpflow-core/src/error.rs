//! Core error types for bpflow-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of graph construction and document loading.

use crate::id::{NodeId, PinId};
use thiserror::Error;

/// Core errors produced by the bpflow-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two nodes in one document share an identifier.
    #[error("duplicate node id: '{id}'")]
    DuplicateNode { id: NodeId },

    /// Two pins in one document share an identifier.
    #[error("duplicate pin id: '{id}'")]
    DuplicatePin { id: PinId },

    /// A node identifier was not found in the graph.
    #[error("node not found: NodeId({id})")]
    NodeNotFound { id: NodeId },

    /// A pin identifier was not found in the graph.
    #[error("pin not found: PinId({id})")]
    PinNotFound { id: PinId },

    /// A link was requested between pins that cannot be linked.
    #[error("invalid link: {reason}")]
    InvalidLink { reason: String },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
