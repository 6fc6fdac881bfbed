//! Graph data model for Blueprint-style node graphs.
//!
//! A [`Graph`] is an arena of [`Node`]s and [`Pin`]s keyed by stable string
//! identifiers. Links are stored as identifier pairs on both endpoints, so all
//! navigation is a map lookup rather than a pointer chase.
//!
//! # Modules
//!
//! - [`id`]: `NodeId` / `PinId` newtypes
//! - [`types`]: pin categories, container kinds and the declared `PinType`
//! - [`pin`]: pins, directions and stored default content
//! - [`node`]: the closed `NodeKind` set and `Node`
//! - [`graph`]: the arena `Graph`, `NodeView` queries and exec topology
//! - [`builder`]: `GraphBuilder` for programmatic construction
//! - [`document`]: the serde JSON document format
//! - [`error`]: `CoreError`

pub mod builder;
pub mod document;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod pin;
pub mod types;

// Re-export commonly used types
pub use builder::GraphBuilder;
pub use document::{GraphDocument, NodeDocument, PinDocument};
pub use error::CoreError;
pub use graph::{Graph, NodeView};
pub use id::{NodeId, PinId};
pub use node::{Node, NodeKind};
pub use pin::{Direction, Pin, PinDefault};
pub use types::{ContainerKind, PinCategory, PinType};
