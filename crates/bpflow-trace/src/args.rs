//! Argument lists, call receivers and call names.

use bpflow_core::{Graph, NodeView, Pin};

use crate::error::ErrorReason;
use crate::expr::{argument, call_with};
use crate::literal::is_trivial_default;
use crate::names::is_implicit_target;
use crate::resolve::Visiting;
use crate::span::{SpanKind, StyledText};
use crate::tracer::Tracer;
use crate::value::SymbolicValue;
use crate::xref::{function_name, identify};

/// Input names that are never listed as arguments.
pub const EXCLUDED_ARGUMENTS: [&str; 10] = [
    "self",
    "Target",
    "WorldContextObject",
    "__WorldContext",
    "LatentInfo",
    "execute",
    "exec",
    "then",
    "__then__",
    "ReturnValue",
];

pub fn is_excluded_argument(name: &str) -> bool {
    EXCLUDED_ARGUMENTS.contains(&name)
}

/// The receiver input of a call-like node.
pub fn target_pin<'g>(view: &NodeView<'g>) -> Option<&'g Pin> {
    view.pins()
        .find(|p| p.is_input() && !p.is_exec() && (p.name == "self" || p.name == "Target"))
}

/// Receiver text for display, or `None` when the value is the trace's own
/// implicit context.
pub fn explicit_receiver(value: &SymbolicValue) -> Option<StyledText> {
    if !value.is_error() && is_implicit_target(&value.to_styled().raw_text()) {
        return None;
    }
    Some(value.as_receiver())
}

/// ` on X`, or ` on (X)` for an expression. Empty for implicit receivers.
pub fn on_receiver(value: &SymbolicValue) -> StyledText {
    match explicit_receiver(value) {
        Some(receiver) => StyledText::plain(" on ").with_text(receiver),
        None => StyledText::new(),
    }
}

impl<'p> Tracer<'p> {
    /// Inputs listed as arguments: data inputs that are linked or carry a
    /// non-trivial default, minus the implicit parameters and `extra`.
    /// `show_all_arguments` keeps trivial defaults; hidden pins stay out.
    pub(crate) fn argument_pins(&self, view: &NodeView<'p>, extra: &[&str]) -> Vec<&'p Pin> {
        let show_all = self.config.show_all_arguments;
        let mut pins: Vec<&'p Pin> = view
            .pins()
            .filter(|p| p.is_input() && !p.is_exec())
            .filter(|p| !is_excluded_argument(&p.name))
            .filter(|p| !extra.iter().any(|e| e.eq_ignore_ascii_case(&p.name)))
            .filter(|p| !p.hidden || p.is_linked())
            .filter(|p| show_all || p.is_linked() || !is_trivial_default(p))
            .collect();
        pins.sort_by_key(|p| p.advanced);
        pins
    }

    /// `name=value` arguments, each resolved on its own.
    pub(crate) fn describe_arguments(
        &mut self,
        graph: &'p Graph,
        view: &NodeView<'p>,
        extra: &[&str],
    ) -> Vec<StyledText> {
        self.argument_pins(view, extra)
            .into_iter()
            .map(|pin| argument(pin.display_name(), self.resolve_value(graph, pin).into_styled()))
            .collect()
    }

    /// `name=value` arguments inside an enclosing resolution.
    pub(crate) fn nested_arguments(
        &mut self,
        view: &NodeView<'p>,
        extra: &[&str],
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Result<Vec<StyledText>, ErrorReason> {
        let pins = self.argument_pins(view, extra);
        self.named_values(view.graph, &pins, depth, visiting)
    }

    /// `name=value` for an explicit pin list inside an enclosing resolution.
    pub(crate) fn named_values(
        &mut self,
        graph: &'p Graph,
        pins: &[&'p Pin],
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Result<Vec<StyledText>, ErrorReason> {
        let mut out = Vec::with_capacity(pins.len());
        for pin in pins {
            let value = self.resolve_pin(graph, pin, depth, visiting)?;
            out.push(argument(pin.display_name(), value.into_styled()));
        }
        Ok(out)
    }

    /// Name of a called function: a cross-reference for user functions,
    /// plain text for engine functions.
    pub(crate) fn call_name(&mut self, view: &NodeView<'p>) -> StyledText {
        match identify(view) {
            Some(reference) => self.reference_name(&reference, SpanKind::FunctionName),
            None => StyledText::styled(SpanKind::FunctionName, function_name(view)),
        }
    }

    /// `[Target.]Name(args)` inside an enclosing resolution.
    pub(crate) fn nested_call(
        &mut self,
        view: &NodeView<'p>,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Result<StyledText, ErrorReason> {
        let mut text = StyledText::new();
        if let Some(target) = target_pin(view).filter(|p| p.is_linked()) {
            let value = self.resolve_pin(view.graph, target, depth, visiting)?;
            if let Some(receiver) = explicit_receiver(&value) {
                text.append(receiver);
                text.push_plain(".");
            }
        }
        let name = self.call_name(view);
        let args = self.nested_arguments(view, &[], depth, visiting)?;
        text.append(call_with(name, args));
        Ok(text)
    }

    /// Resolved receiver of a call-like node, or `self` when unlinked.
    pub(crate) fn describe_receiver(&mut self, graph: &'p Graph, view: &NodeView<'p>) -> SymbolicValue {
        match target_pin(view) {
            Some(pin) if pin.is_linked() => self.resolve_value(graph, pin),
            _ => SymbolicValue::named(SpanKind::Variable, "self"),
        }
    }
}
