//! Programmatic graph construction.
//!
//! [`GraphBuilder`] hands out generated node and pin ids, lets callers set
//! defaults and properties by pin name, and validates everything (including
//! links) when [`GraphBuilder::build`] assembles the final [`Graph`].

use smallvec::SmallVec;

use crate::error::CoreError;
use crate::graph::Graph;
use crate::id::{NodeId, PinId};
use crate::node::{Node, NodeKind};
use crate::pin::{Direction, Pin, PinDefault};
use crate::types::PinType;

/// Incremental builder for a [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    location: String,
    name: String,
    blueprint: String,
    nodes: Vec<Node>,
    pins: Vec<Pin>,
    links: Vec<(PinId, PinId)>,
    next_node: u32,
    next_pin: u32,
}

impl GraphBuilder {
    pub fn new(location: &str, name: &str, blueprint: &str) -> Self {
        GraphBuilder {
            location: location.to_string(),
            name: name.to_string(),
            blueprint: blueprint.to_string(),
            ..GraphBuilder::default()
        }
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Adds a node with a generated id (`N0`, `N1`, ...).
    pub fn node(&mut self, kind: NodeKind, name: &str) -> NodeId {
        let id = NodeId(format!("N{}", self.next_node));
        self.next_node += 1;
        self.nodes.push(Node::new(id.clone(), kind, name));
        id
    }

    /// Sets a declared property on a node.
    pub fn prop(&mut self, node: &NodeId, key: &str, value: &str) -> &mut Self {
        if let Some(n) = self.nodes.iter_mut().find(|n| &n.id == node) {
            n.properties.insert(key.to_string(), value.to_string());
        }
        self
    }

    // -----------------------------------------------------------------------
    // Pins
    // -----------------------------------------------------------------------

    fn add_pin(&mut self, node: &NodeId, name: &str, direction: Direction, ty: PinType) -> PinId {
        let id = PinId(format!("P{}", self.next_pin));
        self.next_pin += 1;
        self.pins.push(Pin {
            id: id.clone(),
            node: node.clone(),
            name: name.to_string(),
            friendly_name: String::new(),
            direction,
            ty,
            default: PinDefault::default(),
            hidden: false,
            advanced: false,
            links: SmallVec::new(),
        });
        id
    }

    pub fn exec_in(&mut self, node: &NodeId, name: &str) -> PinId {
        self.add_pin(node, name, Direction::Input, PinType::exec())
    }

    pub fn exec_out(&mut self, node: &NodeId, name: &str) -> PinId {
        self.add_pin(node, name, Direction::Output, PinType::exec())
    }

    pub fn input(&mut self, node: &NodeId, name: &str, ty: PinType) -> PinId {
        self.add_pin(node, name, Direction::Input, ty)
    }

    pub fn output(&mut self, node: &NodeId, name: &str, ty: PinType) -> PinId {
        self.add_pin(node, name, Direction::Output, ty)
    }

    fn pin_mut(&mut self, node: &NodeId, name: &str) -> Option<&mut Pin> {
        self.pins
            .iter_mut()
            .find(|p| &p.node == node && p.name == name)
    }

    fn pin_by_id_mut(&mut self, pin: &PinId) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|p| &p.id == pin)
    }

    /// Sets the stored default of a pin.
    pub fn set_default(&mut self, pin: &PinId, default: PinDefault) -> &mut Self {
        if let Some(p) = self.pin_by_id_mut(pin) {
            p.default = default;
        }
        self
    }

    /// Shorthand for a raw-text default.
    pub fn value(&mut self, pin: &PinId, value: &str) -> &mut Self {
        self.set_default(pin, PinDefault::value(value))
    }

    pub fn friendly_name(&mut self, node: &NodeId, pin: &str, friendly: &str) -> &mut Self {
        if let Some(p) = self.pin_mut(node, pin) {
            p.friendly_name = friendly.to_string();
        }
        self
    }

    pub fn advanced(&mut self, node: &NodeId, pin: &str) -> &mut Self {
        if let Some(p) = self.pin_mut(node, pin) {
            p.advanced = true;
        }
        self
    }

    pub fn hidden(&mut self, node: &NodeId, pin: &str) -> &mut Self {
        if let Some(p) = self.pin_mut(node, pin) {
            p.hidden = true;
        }
        self
    }

    // -----------------------------------------------------------------------
    // Links
    // -----------------------------------------------------------------------

    /// Records a link from an output pin to an input pin.
    pub fn link(&mut self, from: &PinId, to: &PinId) -> &mut Self {
        self.links.push((from.clone(), to.clone()));
        self
    }

    /// Records a link to a pin that will not exist in the built graph, as
    /// happens when only part of a graph was exported.
    pub fn dangling_link(&mut self, from: &PinId, missing: &str) -> &mut Self {
        let missing = PinId::new(missing);
        if let Some(p) = self.pin_by_id_mut(from) {
            p.links.push(missing);
        }
        self
    }

    /// Assembles and validates the graph.
    pub fn build(self) -> Result<Graph, CoreError> {
        let mut graph = Graph::new(&self.location, &self.name, &self.blueprint);
        for node in self.nodes {
            graph.add_node(node)?;
        }
        for pin in self.pins {
            graph.add_pin(pin)?;
        }
        for (from, to) in &self.links {
            graph.link(from, to)?;
        }
        Ok(graph)
    }
}
