//! Mutable state shared by one trace invocation.
//!
//! [`TraceState`] grows monotonically across the whole trace: the set of
//! already described nodes and the queue of sub-graph definitions still to
//! render. Call-site bindings form a stack that the resolver pushes and pops
//! around each descent into a macro or collapsed graph.

use std::collections::VecDeque;

use bpflow_core::NodeId;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::value::SymbolicValue;
use crate::xref::SubgraphReference;

/// A node identified across graphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub location: String,
    pub node: NodeId,
}

impl NodeKey {
    pub fn new(location: &str, node: &NodeId) -> Self {
        NodeKey {
            location: location.to_string(),
            node: node.clone(),
        }
    }
}

/// Values bound to a sub-graph's entry parameters at one call site.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSiteBinding {
    /// Location of the sub-graph being entered.
    pub location: String,
    /// Entry parameter name to the caller's resolved value.
    pub values: IndexMap<String, SymbolicValue>,
}

/// Shared state of one trace.
#[derive(Debug, Default)]
pub struct TraceState {
    processed: IndexSet<NodeKey>,
    queue: VecDeque<SubgraphReference>,
    queued: IndexSet<String>,
    bindings: Vec<CallSiteBinding>,
}

impl TraceState {
    pub fn new() -> Self {
        TraceState::default()
    }

    /// Records a node as fully described. Returns `false` if it already was.
    pub fn mark_processed(&mut self, key: NodeKey) -> bool {
        self.processed.insert(key)
    }

    pub fn is_processed(&self, key: &NodeKey) -> bool {
        self.processed.contains(key)
    }

    /// Queues a definition once per anchor. Native references are ignored.
    /// Returns `true` when the reference was newly queued.
    pub fn enqueue(&mut self, reference: &SubgraphReference) -> bool {
        if reference.native {
            return false;
        }
        if !self.queued.insert(reference.anchor.clone()) {
            return false;
        }
        debug!(anchor = %reference.anchor, kind = %reference.kind, "queued definition");
        self.queue.push_back(reference.clone());
        true
    }

    /// Marks an anchor as handled without queueing it, so later call sites
    /// do not queue a graph that was already rendered inline.
    pub fn claim_anchor(&mut self, anchor: &str) {
        self.queued.insert(anchor.to_string());
    }

    pub fn is_queued(&self, anchor: &str) -> bool {
        self.queued.contains(anchor)
    }

    /// Next definition to render, in discovery order.
    pub fn pop_definition(&mut self) -> Option<SubgraphReference> {
        self.queue.pop_front()
    }

    pub fn pending_definitions(&self) -> usize {
        self.queue.len()
    }

    pub fn push_binding(&mut self, binding: CallSiteBinding) {
        self.bindings.push(binding);
    }

    pub fn pop_binding(&mut self) -> Option<CallSiteBinding> {
        self.bindings.pop()
    }

    /// The innermost binding for a location, looked up by parameter name.
    pub fn binding_for(&self, location: &str, pin_name: &str) -> Option<&SymbolicValue> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.location == location)
            .and_then(|b| b.values.get(pin_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{SpanKind, StyledText};
    use crate::xref::SubgraphKind;

    #[test]
    fn definitions_queue_once_per_anchor() {
        let mut state = TraceState::new();
        let foo = SubgraphReference::new(SubgraphKind::Function, "/Game/A:Foo", "A.Foo", false);
        assert!(state.enqueue(&foo));
        assert!(!state.enqueue(&foo));
        let native = SubgraphReference::new(SubgraphKind::Function, "/Script/E:X", "E.X", true);
        assert!(!state.enqueue(&native));
        assert_eq!(state.pending_definitions(), 1);
        assert_eq!(state.pop_definition().unwrap().anchor, foo.anchor);
        assert!(state.pop_definition().is_none());
        assert!(!state.enqueue(&foo));
    }

    #[test]
    fn bindings_resolve_innermost_first() {
        let mut state = TraceState::new();
        let bind = |v: &str| CallSiteBinding {
            location: "/Game/A:M".into(),
            values: IndexMap::from([(
                "In".to_string(),
                SymbolicValue::variable(StyledText::styled(SpanKind::Variable, v)),
            )]),
        };
        state.push_binding(bind("Outer"));
        state.push_binding(bind("Inner"));
        let got = state.binding_for("/Game/A:M", "In").unwrap();
        assert_eq!(got.to_styled().to_string(), "Inner");
        state.pop_binding();
        let got = state.binding_for("/Game/A:M", "In").unwrap();
        assert_eq!(got.to_styled().to_string(), "Outer");
        assert!(state.binding_for("/Game/A:M", "Other").is_none());
        assert!(state.binding_for("/Game/B:M", "In").is_none());
    }

    #[test]
    fn processed_nodes() {
        let mut state = TraceState::new();
        let key = NodeKey::new("/Game/A:G", &NodeId::new("N1"));
        assert!(state.mark_processed(key.clone()));
        assert!(!state.mark_processed(key.clone()));
        assert!(state.is_processed(&key));
    }
}
