//! Stable ID newtypes for graph entities.
//!
//! Editor graphs identify nodes and pins with GUID strings. Both IDs are
//! distinct newtype wrappers over `String` so that a `NodeId` cannot be
//! accidentally used where a `PinId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Stable pin identifier, unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for diagnostics.
    pub fn short(&self) -> &str {
        short_prefix(&self.0)
    }
}

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        PinId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for diagnostics.
    pub fn short(&self) -> &str {
        short_prefix(&self.0)
    }
}

fn short_prefix(s: &str) -> &str {
    match s.char_indices().nth(8) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<&str> for PinId {
    fn from(s: &str) -> Self {
        PinId(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display() {
        assert_eq!(format!("{}", NodeId::new("A1B2")), "A1B2");
    }

    #[test]
    fn pin_id_display() {
        assert_eq!(format!("{}", PinId::new("P-9")), "P-9");
    }

    #[test]
    fn short_truncates_to_eight_chars() {
        let id = NodeId::new("0123456789ABCDEF");
        assert_eq!(id.short(), "01234567");
        assert_eq!(NodeId::new("abc").short(), "abc");
    }

    #[test]
    fn ids_order_lexically() {
        let mut ids = vec![NodeId::new("b"), NodeId::new("a"), NodeId::new("c")];
        ids.sort();
        assert_eq!(ids, vec![NodeId::new("a"), NodeId::new("b"), NodeId::new("c")]);
    }

    #[test]
    fn serde_is_transparent() {
        let node = NodeId::new("N1");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, "\"N1\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);

        let pin: PinId = serde_json::from_str("\"P7\"").unwrap();
        assert_eq!(pin, PinId::new("P7"));
    }
}
