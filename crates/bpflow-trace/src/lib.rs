//! Symbolic execution-path tracing for Blueprint-style node graphs.
//!
//! Given a start node, the engine walks the graph's execution links and
//! emits one styled line per step, resolving every data input into a
//! symbolic expression such as `(Health - Damage)` instead of a runtime
//! value. Calls into user-authored functions, macros, collapsed graphs,
//! custom events and interfaces become cross-references that are queued and
//! rendered as separate definition sections.
//!
//! # Modules
//!
//! - [`config`]: `TraceConfig` depth ceilings and display switches
//! - [`error`]: `TraceError` (caller misuse) and in-band `ErrorReason`
//! - [`span`]: `SpanKind` categories and `StyledText`
//! - [`render`]: `Renderer` trait with Markdown, HTML and plain back ends
//! - [`value`]: `SymbolicValue`, the resolver's output
//! - [`literal`]: default-value formatting and trivial-default detection
//! - [`names`]: event, owner and member naming helpers
//! - [`expr`]: operator tables and expression layout
//! - [`xref`]: sub-graph identification, anchors and display names
//! - [`state`]: processed set, definition queue and call-site bindings
//! - [`tracer`]: the `Tracer` engine
//! - [`args`]: argument lists and call receivers
//! - [`describe`]: one-line step descriptions per node kind
//! - [`path`]: the execution walk and `ExecutionTrace`
//! - [`document`]: `DocumentBuilder` and `Document`

pub mod args;
pub mod config;
pub mod describe;
pub mod document;
pub mod error;
pub mod expr;
pub mod literal;
pub mod names;
pub mod path;
pub mod render;
mod resolve;
pub mod span;
pub mod state;
pub mod tracer;
pub mod value;
pub mod xref;

// Re-export commonly used types
pub use config::TraceConfig;
pub use describe::CapturedEventData;
pub use document::{DefinitionSection, Document, DocumentBuilder, RootSection};
pub use error::{ErrorReason, TraceError};
pub use path::{ExecutionTrace, TraceLine};
pub use render::{HtmlRenderer, MarkdownRenderer, OutputMode, PlainRenderer, Renderer};
pub use span::{Segment, SpanKind, StyledText};
pub use state::{CallSiteBinding, NodeKey, TraceState};
pub use tracer::Tracer;
pub use value::SymbolicValue;
pub use xref::{canonical_anchor, display_name, identify, sanitize_anchor, SubgraphKind, SubgraphReference};
