//! Graph provider abstraction for bpflow.
//!
//! The trace engine never touches storage directly. It asks a
//! [`GraphProvider`] for the graph at a location key whenever it needs to
//! inline a sub-graph or render a queued definition.
//!
//! # Modules
//!
//! - [`error`]: StoreError enum with all failure modes
//! - [`traits`]: GraphProvider trait definition and location-key helpers
//! - [`memory`]: InMemoryProvider implementation
//! - [`loader`]: JSON file and directory loading

pub mod error;
pub mod loader;
pub mod memory;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StoreError;
pub use loader::{load_directory, load_file, load_path, load_str};
pub use memory::InMemoryProvider;
pub use traits::{normalize_location, GraphProvider};
