//! Graph: the arena container for one node graph.
//!
//! [`Graph`] owns every [`Node`] and [`Pin`] of one graph scope (an event
//! graph, a function, a macro or a collapsed sub-graph), keyed by their stable
//! identifiers. Links are identifier pairs stored on both endpoints; there are
//! no back-pointers, so the graph is freely cloneable and never mutated while
//! a trace reads it.
//!
//! [`NodeView`] is a borrowed `(graph, node)` pair that answers the per-node
//! pin queries the trace engine needs (pin by name, main exec pins, visible
//! data inputs).

use indexmap::IndexMap;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction as EdgeDirection;

use crate::error::CoreError;
use crate::id::{NodeId, PinId};
use crate::node::{Node, NodeKind};
use crate::pin::{Direction, Pin};

/// Exec output names tried, in order, when no preferred name matches.
const EXEC_OUTPUT_FALLBACKS: [&str; 10] = [
    "then",
    "Then",
    "Completed",
    "LoopBody",
    "Exit",
    "Success",
    "A",
    "Pressed",
    "Released",
    "Update",
];

/// Names of the main exec input, in priority order.
const EXEC_INPUT_NAMES: [&str; 3] = ["execute", "exec", "in"];

/// One graph scope: an arena of nodes and pins.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Location key in the graph store, e.g. `/Game/MyAsset:EventGraph`.
    pub location: String,
    /// Graph name, e.g. `EventGraph` or a function name.
    pub name: String,
    /// Name of the owning blueprint; the implicit scope of `self` calls.
    pub blueprint: String,
    nodes: IndexMap<NodeId, Node>,
    pins: IndexMap<PinId, Pin>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new(location: &str, name: &str, blueprint: &str) -> Self {
        Graph {
            location: location.to_string(),
            name: name.to_string(),
            blueprint: blueprint.to_string(),
            nodes: IndexMap::new(),
            pins: IndexMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation (construction only)
    // -----------------------------------------------------------------------

    /// Adds a node. Its `pins` list is rebuilt as pins are added.
    pub fn add_node(&mut self, mut node: Node) -> Result<(), CoreError> {
        if self.nodes.contains_key(&node.id) {
            return Err(CoreError::DuplicateNode { id: node.id });
        }
        node.pins.clear();
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Adds a pin to its owning node. Recorded links are kept as-is.
    pub fn add_pin(&mut self, pin: Pin) -> Result<(), CoreError> {
        if self.pins.contains_key(&pin.id) {
            return Err(CoreError::DuplicatePin { id: pin.id });
        }
        let owner = self
            .nodes
            .get_mut(&pin.node)
            .ok_or_else(|| CoreError::NodeNotFound {
                id: pin.node.clone(),
            })?;
        owner.pins.push(pin.id.clone());
        self.pins.insert(pin.id.clone(), pin);
        Ok(())
    }

    /// Links an output pin to an input pin, recording the link on both ends.
    pub fn link(&mut self, from: &PinId, to: &PinId) -> Result<(), CoreError> {
        let (from_dir, from_node) = {
            let p = self
                .pins
                .get(from)
                .ok_or_else(|| CoreError::PinNotFound { id: from.clone() })?;
            (p.direction, p.node.clone())
        };
        let (to_dir, to_node) = {
            let p = self
                .pins
                .get(to)
                .ok_or_else(|| CoreError::PinNotFound { id: to.clone() })?;
            (p.direction, p.node.clone())
        };
        if from_dir != Direction::Output || to_dir != Direction::Input {
            return Err(CoreError::InvalidLink {
                reason: format!("link must run output -> input ({from} -> {to})"),
            });
        }
        if from_node == to_node {
            return Err(CoreError::InvalidLink {
                reason: format!("pins {from} and {to} belong to the same node"),
            });
        }
        if let Some(p) = self.pins.get_mut(from) {
            if !p.links.contains(to) {
                p.links.push(to.clone());
            }
        }
        if let Some(p) = self.pins.get_mut(to) {
            if !p.links.contains(from) {
                p.links.push(from.clone());
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn pin(&self, id: &PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    pub fn view(&self, id: &NodeId) -> Option<NodeView<'_>> {
        self.nodes.get(id).map(|node| NodeView { graph: self, node })
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'_>> {
        self.nodes.values().map(move |node| NodeView { graph: self, node })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// The node owning a pin.
    pub fn owner_of(&self, pin: &Pin) -> Option<NodeView<'_>> {
        self.view(&pin.node)
    }

    /// The producing pin for an input: its first link. `None` when unlinked or
    /// when the linked pin is not part of this graph.
    pub fn source_of(&self, input: &Pin) -> Option<&Pin> {
        input.links.first().and_then(|id| self.pins.get(id))
    }

    /// Consumer pins linked to an output, skipping links that leave the graph.
    pub fn targets_of<'a>(&'a self, output: &'a Pin) -> impl Iterator<Item = &'a Pin> + 'a {
        output.links.iter().filter_map(move |id| self.pins.get(id))
    }

    /// The asset part of the location key (before the first `:`).
    pub fn asset_path(&self) -> &str {
        self.location
            .split_once(':')
            .map(|(asset, _)| asset)
            .unwrap_or(&self.location)
    }

    /// Nodes that start execution: events, plus any node with outgoing exec
    /// links and no incoming ones. Returned in document order.
    pub fn entry_nodes(&self) -> Vec<NodeId> {
        let topology = self.exec_topology();
        self.nodes
            .values()
            .enumerate()
            .filter(|(idx, node)| {
                if node.kind.is_event() {
                    return true;
                }
                if !topology.contains_node(*idx) {
                    return false;
                }
                topology
                    .neighbors_directed(*idx, EdgeDirection::Incoming)
                    .next()
                    .is_none()
                    && topology
                        .neighbors_directed(*idx, EdgeDirection::Outgoing)
                        .next()
                        .is_some()
            })
            .map(|(_, node)| node.id.clone())
            .collect()
    }

    /// Directed exec-flow graph over node indices (document order).
    pub fn exec_topology(&self) -> DiGraphMap<usize, ()> {
        let mut topology = DiGraphMap::new();
        for (idx, node) in self.nodes.values().enumerate() {
            for pin_id in &node.pins {
                let Some(pin) = self.pins.get(pin_id) else {
                    continue;
                };
                if !pin.is_exec() || !pin.is_output() {
                    continue;
                }
                for target in self.targets_of(pin) {
                    if let Some(target_idx) = self.nodes.get_index_of(&target.node) {
                        topology.add_edge(idx, target_idx, ());
                    }
                }
            }
        }
        topology
    }
}

/// A borrowed view of one node inside its graph.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'g> {
    pub graph: &'g Graph,
    pub node: &'g Node,
}

impl<'g> NodeView<'g> {
    pub fn id(&self) -> &'g NodeId {
        &self.node.id
    }

    pub fn kind(&self) -> &'g NodeKind {
        &self.node.kind
    }

    pub fn name(&self) -> &'g str {
        &self.node.name
    }

    pub fn property(&self, key: &str) -> Option<&'g str> {
        self.node.property(key)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.node.flag(key)
    }

    /// Owned pins in declaration order.
    pub fn pins(&self) -> impl Iterator<Item = &'g Pin> + 'g {
        let graph = self.graph;
        let node = self.node;
        node.pins.iter().filter_map(move |id| graph.pin(id))
    }

    /// Finds a pin by exact name, then case-insensitively, then by friendly name.
    pub fn pin(&self, name: &str) -> Option<&'g Pin> {
        self.find_pin(name, None)
    }

    pub fn input(&self, name: &str) -> Option<&'g Pin> {
        self.find_pin(name, Some(Direction::Input))
    }

    pub fn output(&self, name: &str) -> Option<&'g Pin> {
        self.find_pin(name, Some(Direction::Output))
    }

    fn find_pin(&self, name: &str, direction: Option<Direction>) -> Option<&'g Pin> {
        let matches_dir = |p: &&Pin| direction.map_or(true, |d| d == p.direction);
        self.pins()
            .filter(matches_dir)
            .find(|p| p.name == name)
            .or_else(|| {
                self.pins()
                    .filter(matches_dir)
                    .find(|p| p.name.eq_ignore_ascii_case(name))
            })
            .or_else(|| {
                self.pins()
                    .filter(matches_dir)
                    .find(|p| !p.friendly_name.is_empty() && p.friendly_name.eq_ignore_ascii_case(name))
            })
    }

    pub fn exec_inputs(&self) -> impl Iterator<Item = &'g Pin> + 'g {
        self.pins().filter(|p| p.is_exec() && p.is_input())
    }

    pub fn exec_outputs(&self) -> impl Iterator<Item = &'g Pin> + 'g {
        self.pins().filter(|p| p.is_exec() && p.is_output())
    }

    /// Visible, non-exec inputs: non-advanced pins first, declaration order otherwise.
    pub fn data_inputs(&self) -> Vec<&'g Pin> {
        let mut pins: Vec<&Pin> = self
            .pins()
            .filter(|p| !p.is_exec() && p.is_input() && !p.hidden)
            .collect();
        pins.sort_by_key(|p| p.advanced);
        pins
    }

    /// Non-exec outputs in declaration order.
    pub fn data_outputs(&self) -> impl Iterator<Item = &'g Pin> + 'g {
        self.pins().filter(|p| !p.is_exec() && p.is_output())
    }

    /// The main exec input.
    pub fn exec_input(&self) -> Option<&'g Pin> {
        EXEC_INPUT_NAMES
            .iter()
            .find_map(|name| {
                self.exec_inputs()
                    .find(|p| p.name.eq_ignore_ascii_case(name))
            })
            .or_else(|| self.exec_inputs().next())
    }

    /// An exec output: the preferred name if present, otherwise the usual
    /// continuation names, otherwise the first visible exec output.
    pub fn exec_output(&self, preferred: &str) -> Option<&'g Pin> {
        if !preferred.is_empty() {
            if let Some(pin) = self
                .exec_outputs()
                .find(|p| p.name.eq_ignore_ascii_case(preferred))
            {
                return Some(pin);
            }
        }
        EXEC_OUTPUT_FALLBACKS
            .iter()
            .find_map(|name| self.exec_outputs().find(|p| p.name == *name))
            .or_else(|| self.exec_outputs().find(|p| !p.hidden))
    }

    /// A node with no exec pins at all.
    pub fn is_pure(&self) -> bool {
        !self.pins().any(|p| p.is_exec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::types::{PinCategory, PinType};

    fn bool_ty() -> PinType {
        PinType::new(PinCategory::Bool)
    }

    #[test]
    fn pin_lookup_falls_back_to_case_insensitive_and_friendly() {
        let mut b = GraphBuilder::new("/Game/A:EventGraph", "EventGraph", "A");
        let n = b.node(NodeKind::CallFunction, "SetSpeed");
        b.input(&n, "bEnabled", bool_ty());
        b.friendly_name(&n, "bEnabled", "Enabled");
        let g = b.build().unwrap();
        let view = g.view(&n).unwrap();
        assert_eq!(view.pin("bEnabled").unwrap().name, "bEnabled");
        assert_eq!(view.pin("benabled").unwrap().name, "bEnabled");
        assert_eq!(view.pin("Enabled").unwrap().name, "bEnabled");
        assert!(view.output("bEnabled").is_none());
    }

    #[test]
    fn exec_output_fallback_chain() {
        let mut b = GraphBuilder::new("/Game/A:EventGraph", "EventGraph", "A");
        let n = b.node(NodeKind::MacroInstance, "ForEachLoop");
        b.exec_in(&n, "execute");
        b.exec_out(&n, "LoopBody");
        b.exec_out(&n, "Completed");
        let g = b.build().unwrap();
        let view = g.view(&n).unwrap();
        assert_eq!(view.exec_output("").unwrap().name, "Completed");
        assert_eq!(view.exec_output("LoopBody").unwrap().name, "LoopBody");
        assert_eq!(view.exec_input().unwrap().name, "execute");
        assert!(!view.is_pure());
    }

    #[test]
    fn link_rejects_wrong_direction_and_self_links() {
        let mut b = GraphBuilder::new("/Game/A:EventGraph", "EventGraph", "A");
        let a = b.node(NodeKind::CallFunction, "A");
        let a_out = b.exec_out(&a, "then");
        let a_in = b.exec_in(&a, "execute");
        let c = b.node(NodeKind::CallFunction, "C");
        let c_in = b.exec_in(&c, "execute");
        let mut g = b.build().unwrap();
        assert!(matches!(
            g.link(&c_in, &a_out),
            Err(CoreError::InvalidLink { .. })
        ));
        assert!(matches!(
            g.link(&a_out, &a_in),
            Err(CoreError::InvalidLink { .. })
        ));
        g.link(&a_out, &c_in).unwrap();
        let out = g.pin(&a_out).unwrap();
        assert_eq!(out.links.len(), 1);
        assert_eq!(g.source_of(g.pin(&c_in).unwrap()).unwrap().id, a_out);
    }

    #[test]
    fn entry_nodes_include_events_and_unreached_heads() {
        let mut b = GraphBuilder::new("/Game/A:EventGraph", "EventGraph", "A");
        let ev = b.node(NodeKind::Event, "ReceiveBeginPlay");
        let ev_out = b.exec_out(&ev, "then");
        let call = b.node(NodeKind::CallFunction, "PrintString");
        let call_in = b.exec_in(&call, "execute");
        let call_out = b.exec_out(&call, "then");
        let orphan = b.node(NodeKind::CallFunction, "Orphan");
        b.exec_in(&orphan, "execute");
        let orphan_out = b.exec_out(&orphan, "then");
        let tail = b.node(NodeKind::CallFunction, "Tail");
        let tail_in = b.exec_in(&tail, "execute");
        b.link(&ev_out, &call_in);
        b.link(&orphan_out, &tail_in);
        let _ = call_out;
        let g = b.build().unwrap();
        assert_eq!(g.entry_nodes(), vec![ev, orphan]);
    }

    #[test]
    fn data_inputs_put_advanced_last() {
        let mut b = GraphBuilder::new("/Game/A:EventGraph", "EventGraph", "A");
        let n = b.node(NodeKind::CallFunction, "F");
        b.exec_in(&n, "execute");
        b.input(&n, "Adv", bool_ty());
        b.advanced(&n, "Adv");
        b.input(&n, "First", bool_ty());
        b.input(&n, "Second", bool_ty());
        let g = b.build().unwrap();
        let names: Vec<_> = g
            .view(&n)
            .unwrap()
            .data_inputs()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Adv"]);
    }

    #[test]
    fn asset_path_is_location_prefix() {
        let g = Graph::new("/Game/MyAsset:EventGraph", "EventGraph", "MyAsset");
        assert_eq!(g.asset_path(), "/Game/MyAsset");
        let bare = Graph::new("/Game/Other", "EventGraph", "Other");
        assert_eq!(bare.asset_path(), "/Game/Other");
    }
}
