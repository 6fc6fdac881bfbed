//! The resolver's output value.

use bpflow_core::PinType;

use crate::error::ErrorReason;
use crate::span::{SpanKind, StyledText};

/// A symbolically resolved pin value.
///
/// One tag plus a separate declared-type descriptor: literals keep the pin
/// type they were formatted for, every other variant is just text.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicValue {
    /// A formatted default or literal node value.
    Literal { text: StyledText, ty: PinType },
    /// A reference to a variable, parameter or other named value.
    VariableRef { text: StyledText },
    /// Composed call, operator or accessor text.
    Expression { text: StyledText },
    /// In-band failure.
    Error { reason: ErrorReason },
}

impl SymbolicValue {
    pub fn literal(text: StyledText, ty: &PinType) -> Self {
        SymbolicValue::Literal {
            text,
            ty: ty.clone(),
        }
    }

    pub fn variable(text: StyledText) -> Self {
        SymbolicValue::VariableRef { text }
    }

    /// Shorthand for a single variable-tagged name.
    pub fn named(kind: SpanKind, name: &str) -> Self {
        SymbolicValue::VariableRef {
            text: StyledText::styled(kind, name),
        }
    }

    pub fn expression(text: StyledText) -> Self {
        SymbolicValue::Expression { text }
    }

    pub fn error(reason: ErrorReason) -> Self {
        SymbolicValue::Error { reason }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SymbolicValue::Error { .. })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, SymbolicValue::Literal { .. })
    }

    /// Display form. Errors become an error-tagged marker.
    pub fn to_styled(&self) -> StyledText {
        match self {
            SymbolicValue::Literal { text, .. }
            | SymbolicValue::VariableRef { text }
            | SymbolicValue::Expression { text } => text.clone(),
            SymbolicValue::Error { reason } => StyledText::styled(SpanKind::Error, reason.marker()),
        }
    }

    /// Consuming variant of [`SymbolicValue::to_styled`].
    pub fn into_styled(self) -> StyledText {
        match self {
            SymbolicValue::Literal { text, .. }
            | SymbolicValue::VariableRef { text }
            | SymbolicValue::Expression { text } => text,
            SymbolicValue::Error { reason } => StyledText::styled(SpanKind::Error, reason.marker()),
        }
    }

    /// True when the text is a bare identifier-like token that can be
    /// used as a member-access receiver without parentheses.
    pub fn is_simple(&self) -> bool {
        if self.is_error() {
            return false;
        }
        let raw = self.to_styled().raw_text();
        !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | ':'))
    }

    /// Receiver form: simple values as-is, anything else parenthesized.
    pub fn as_receiver(&self) -> StyledText {
        if self.is_simple() {
            self.to_styled()
        } else {
            StyledText::parenthesized(self.to_styled())
        }
    }
}
