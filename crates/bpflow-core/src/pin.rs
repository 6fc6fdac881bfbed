//! Pins: named, typed ports owned by exactly one node.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::id::{NodeId, PinId};
use crate::types::PinType;

/// Direction of a pin relative to its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

/// Stored default content of a pin.
///
/// Editors store defaults as raw text, an object reference, localized text,
/// or (for split structs) a field map. Any combination may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDefault {
    /// Raw stored text, e.g. `false`, `1.500000`, `(X=0,Y=0,Z=0)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Object or asset reference path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Localized text value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Decomposed struct fields, in stored order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, String>,
    /// User-facing enumerator display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The editor's autogenerated default, used to detect untouched pins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autogenerated: Option<String>,
}

impl PinDefault {
    pub fn value(text: impl Into<String>) -> Self {
        PinDefault {
            value: Some(text.into()),
            ..PinDefault::default()
        }
    }

    pub fn object(path: impl Into<String>) -> Self {
        PinDefault {
            object: Some(path.into()),
            ..PinDefault::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        PinDefault {
            text: Some(text.into()),
            ..PinDefault::default()
        }
    }

    /// True when no content of any kind is stored.
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
            && self.object.as_deref().map_or(true, str::is_empty)
            && self.text.as_deref().map_or(true, str::is_empty)
            && self.fields.is_empty()
    }
}

/// A named, typed input or output port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    /// Owning node.
    pub node: NodeId,
    pub name: String,
    #[serde(default)]
    pub friendly_name: String,
    pub direction: Direction,
    pub ty: PinType,
    #[serde(default)]
    pub default: PinDefault,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub advanced: bool,
    /// Linked pins on other nodes. An input normally has at most one.
    #[serde(default)]
    pub links: SmallVec<[PinId; 2]>,
}

impl Pin {
    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }

    pub fn is_exec(&self) -> bool {
        self.ty.is_exec()
    }

    pub fn is_linked(&self) -> bool {
        !self.links.is_empty()
    }

    /// Friendly name if set, otherwise the raw name.
    pub fn display_name(&self) -> &str {
        if self.friendly_name.trim().is_empty() {
            &self.name
        } else {
            &self.friendly_name
        }
    }
}
