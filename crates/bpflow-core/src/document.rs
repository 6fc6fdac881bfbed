//! JSON document format for graphs.
//!
//! A [`GraphDocument`] nests pins inside their nodes, which is how graph
//! exporters naturally write them. Loading flattens the document into the
//! [`Graph`] arena; links are taken from each pin's recorded link list, so a
//! partially exported graph keeps its dangling links.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::CoreError;
use crate::graph::Graph;
use crate::id::{NodeId, PinId};
use crate::node::{Node, NodeKind};
use crate::pin::{Direction, Pin, PinDefault};
use crate::types::PinType;

/// Serialized form of one graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub location: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub blueprint: String,
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
}

/// Serialized form of one node with its pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
    #[serde(default)]
    pub pins: Vec<PinDocument>,
}

/// Serialized form of one pin. The owning node is implied by nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDocument {
    pub id: PinId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub friendly_name: String,
    pub direction: Direction,
    #[serde(rename = "type")]
    pub ty: PinType,
    #[serde(default, skip_serializing_if = "PinDefault::is_empty")]
    pub default: PinDefault,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub advanced: bool,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub links: SmallVec<[PinId; 2]>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Graph {
    /// Flattens a document into the arena.
    pub fn from_document(doc: GraphDocument) -> Result<Graph, CoreError> {
        let mut graph = Graph::new(&doc.location, &doc.name, &doc.blueprint);
        for node_doc in doc.nodes {
            let node_id = node_doc.id.clone();
            let mut node = Node::new(node_doc.id, node_doc.kind, node_doc.name);
            node.properties = node_doc.properties;
            graph.add_node(node)?;
            for pin_doc in node_doc.pins {
                graph.add_pin(Pin {
                    id: pin_doc.id,
                    node: node_id.clone(),
                    name: pin_doc.name,
                    friendly_name: pin_doc.friendly_name,
                    direction: pin_doc.direction,
                    ty: pin_doc.ty,
                    default: pin_doc.default,
                    hidden: pin_doc.hidden,
                    advanced: pin_doc.advanced,
                    links: pin_doc.links,
                })?;
            }
        }
        Ok(graph)
    }

    /// Nests the arena back into document form.
    pub fn to_document(&self) -> GraphDocument {
        let nodes = self
            .nodes()
            .map(|view| NodeDocument {
                id: view.node.id.clone(),
                kind: view.node.kind.clone(),
                name: view.node.name.clone(),
                properties: view.node.properties.clone(),
                pins: view
                    .pins()
                    .map(|pin| PinDocument {
                        id: pin.id.clone(),
                        name: pin.name.clone(),
                        friendly_name: pin.friendly_name.clone(),
                        direction: pin.direction,
                        ty: pin.ty.clone(),
                        default: pin.default.clone(),
                        hidden: pin.hidden,
                        advanced: pin.advanced,
                        links: pin.links.clone(),
                    })
                    .collect(),
            })
            .collect();
        GraphDocument {
            location: self.location.clone(),
            name: self.name.clone(),
            blueprint: self.blueprint.clone(),
            nodes,
        }
    }

    pub fn from_json(json: &str) -> Result<Graph, CoreError> {
        let doc: GraphDocument = serde_json::from_str(json)?;
        Graph::from_document(doc)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }
}
