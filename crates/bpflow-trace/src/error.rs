//! Error types for the trace engine.
//!
//! Two families live here. [`TraceError`] is returned for caller misuse (a
//! start node that does not exist) and is the only error a trace call can
//! fail with. [`ErrorReason`] is in-band: it describes a problem inside one
//! sub-expression and is carried in a `SymbolicValue::Error`, so a malformed
//! region of a graph never stops the rest of the document from rendering.

use bpflow_core::NodeId;
use thiserror::Error;

/// Errors returned by the public tracing entry points.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The requested start node is not part of the graph.
    #[error("start node not found: {id} in {location}")]
    StartNodeNotFound { id: NodeId, location: String },

    /// The provider has no graph at the requested location.
    #[error("graph not found: {location}")]
    GraphNotFound { location: String },

    /// The requested pin is not part of the graph.
    #[error("pin not found: {pin} in {location}")]
    PinNotFound { pin: String, location: String },
}

/// Why a value could not be resolved. Rendered inline as an error marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorReason {
    #[error("cyclic data reference")]
    CyclicDataReference { pin: String },

    #[error("unsupported node kind")]
    UnsupportedNodeKind { kind: String },

    #[error("resolution depth exceeded")]
    ResolutionDepthExceeded { limit: usize },

    #[error("array input missing")]
    ArrayInputMissing,

    #[error("missing pin")]
    MissingPin { role: String },
}

impl ErrorReason {
    /// Extra context shown after the reason.
    pub fn detail(&self) -> Option<String> {
        match self {
            ErrorReason::CyclicDataReference { pin } => Some(pin.clone()),
            ErrorReason::UnsupportedNodeKind { kind } => Some(kind.clone()),
            ErrorReason::ResolutionDepthExceeded { limit } => Some(limit.to_string()),
            ErrorReason::ArrayInputMissing => None,
            ErrorReason::MissingPin { role } => Some(role.clone()),
        }
    }

    /// Marker text: the reason, followed by its detail in parentheses.
    pub fn marker(&self) -> String {
        match self.detail() {
            Some(detail) if !detail.is_empty() => format!("{self} ({detail})"),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_display_is_the_bare_reason() {
        let cycle = ErrorReason::CyclicDataReference { pin: "A".into() };
        assert_eq!(cycle.to_string(), "cyclic data reference");
        assert_eq!(cycle.marker(), "cyclic data reference (A)");
        assert_eq!(ErrorReason::ArrayInputMissing.marker(), "array input missing");
    }

    #[test]
    fn trace_error_messages() {
        let err = TraceError::StartNodeNotFound {
            id: NodeId::new("N9"),
            location: "/Game/A:EventGraph".into(),
        };
        assert_eq!(
            err.to_string(),
            "start node not found: N9 in /Game/A:EventGraph"
        );
    }
}
