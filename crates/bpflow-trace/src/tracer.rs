//! The [`Tracer`]: one trace invocation's engine and its shared state.
//!
//! The behaviour is split across several files, each adding an `impl` block:
//!
//! - `resolve.rs`: recursive data-value resolution
//! - `args.rs`: argument lists, call receivers and call names
//! - `describe.rs`: one-line step descriptions per node kind
//! - `path.rs`: the execution-path walk

use bpflow_core::{Graph, NodeId, PinId};
use bpflow_store::GraphProvider;
use tracing::debug;

use crate::config::TraceConfig;
use crate::describe::CapturedEventData;
use crate::error::TraceError;
use crate::span::{SpanKind, StyledText};
use crate::state::TraceState;
use crate::value::SymbolicValue;
use crate::xref::{display_name, SubgraphKind, SubgraphReference};

/// Symbolic trace engine over graphs supplied by a [`GraphProvider`].
///
/// A tracer owns one [`TraceState`], so every trace and resolution made
/// through the same tracer shares the set of described nodes and the
/// definition queue.
pub struct Tracer<'p> {
    pub(crate) provider: &'p dyn GraphProvider,
    pub(crate) config: TraceConfig,
    pub(crate) state: TraceState,
    /// Blueprint name of the graph being traced; call sites inside it show
    /// unqualified names.
    pub(crate) scope: String,
    /// References newly queued since the last trace began.
    pub(crate) discovered: Vec<SubgraphReference>,
}

impl<'p> Tracer<'p> {
    pub fn new(provider: &'p dyn GraphProvider, config: TraceConfig) -> Self {
        Tracer {
            provider,
            config,
            state: TraceState::new(),
            scope: String::new(),
            discovered: Vec::new(),
        }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn state(&self) -> &TraceState {
        &self.state
    }

    pub fn provider(&self) -> &'p dyn GraphProvider {
        self.provider
    }

    /// Next queued sub-graph definition, in discovery order.
    pub fn next_definition(&mut self) -> Option<SubgraphReference> {
        self.state.pop_definition()
    }

    /// Resolves one pin to its symbolic value.
    pub fn resolve(&mut self, location: &str, pin: &PinId) -> Result<SymbolicValue, TraceError> {
        let graph = self.require_graph(location)?;
        let pin = graph.pin(pin).ok_or_else(|| TraceError::PinNotFound {
            pin: pin.to_string(),
            location: location.to_string(),
        })?;
        self.enter_scope(graph);
        Ok(self.resolve_value(graph, pin))
    }

    /// Describes one node as a single step line.
    pub fn describe(
        &mut self,
        location: &str,
        node: &NodeId,
        captured: Option<&CapturedEventData>,
    ) -> Result<StyledText, TraceError> {
        let graph = self.require_graph(location)?;
        let view = graph.view(node).ok_or_else(|| TraceError::StartNodeNotFound {
            id: node.clone(),
            location: location.to_string(),
        })?;
        self.enter_scope(graph);
        Ok(self.describe_step(graph, &view, captured))
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    pub(crate) fn require_graph(&self, location: &str) -> Result<&'p Graph, TraceError> {
        self.provider
            .graph(location)
            .ok_or_else(|| TraceError::GraphNotFound {
                location: location.to_string(),
            })
    }

    /// Sets the display scope to the graph's blueprint.
    pub(crate) fn enter_scope(&mut self, graph: &Graph) {
        self.scope = if graph.blueprint.is_empty() {
            bpflow_core::types::simple_name_from_path(graph.asset_path())
        } else {
            graph.blueprint.clone()
        };
    }

    /// True when a collapsed-graph call is traced in place rather than
    /// linked to a separate definition.
    pub(crate) fn inlines(&self, reference: &SubgraphReference) -> bool {
        reference.kind == SubgraphKind::CollapsedGraph
            && self.config.inline_collapsed_graphs
            && self.provider.graph(&reference.location).is_some()
    }

    /// Queues a reference for its own definition section.
    pub(crate) fn register(&mut self, reference: &SubgraphReference) {
        if self.state.enqueue(reference) {
            self.discovered.push(reference.clone());
        }
    }

    /// Call-site name for a sub-graph: a registered cross-reference for
    /// user-authored units, plain text otherwise.
    pub(crate) fn reference_name(
        &mut self,
        reference: &SubgraphReference,
        kind: SpanKind,
    ) -> StyledText {
        if reference.native {
            return StyledText::styled(kind, reference.item_name());
        }
        let label = display_name(&reference.hint, &self.scope);
        if self.inlines(reference) {
            return StyledText::styled(kind, label);
        }
        debug!(anchor = %reference.anchor, "cross-reference");
        self.register(reference);
        StyledText::link(reference.anchor.clone(), StyledText::styled(kind, label))
    }
}
