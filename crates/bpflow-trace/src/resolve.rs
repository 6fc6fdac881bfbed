//! Recursive data-value resolution.
//!
//! [`Tracer::resolve_value`] turns one pin into a [`SymbolicValue`] by
//! following its producing link and dispatching on the producer's node kind.
//! Every producer kind has one arm in [`Tracer::resolve_output`].
//!
//! # Cycles and ceilings
//!
//! One top-level resolution carries a *visiting* set: the pins on the current
//! resolution path. A pin is removed again when its resolution returns, so a
//! producer shared by two operands is not a cycle. Revisiting a pin on the
//! path is a data cycle; it is returned as `Err` and propagated with `?` to
//! the top, where the whole value becomes an error marker. Every other
//! problem (missing pins, unsupported kinds, the depth ceiling) is an
//! in-band `Ok(SymbolicValue::Error)` that only replaces its own
//! sub-expression.

use bpflow_core::types::simple_name_from_path;
use bpflow_core::{ContainerKind, Graph, NodeKind, NodeView, Pin, PinCategory, PinId};
use indexmap::{IndexMap, IndexSet};
use tracing::{trace, warn};

use crate::args::{explicit_receiver, is_excluded_argument, target_pin};
use crate::error::ErrorReason;
use crate::expr::{
    binary, call, call_with, conversion_name, member, nary, operation_base, operator_symbol,
    select, unary, unary_symbol,
};
use crate::literal::format_default;
use crate::names::member_path;
use crate::span::{SpanKind, StyledText};
use crate::state::CallSiteBinding;
use crate::tracer::Tracer;
use crate::value::SymbolicValue;
use crate::xref::{function_name, identify, SubgraphReference};

/// Pins on the current resolution path, keyed by graph location and pin id.
pub(crate) type Visiting<'p> = IndexSet<(&'p str, &'p PinId)>;

/// `Err` only for a data cycle, which aborts the whole top-level resolution.
pub(crate) type Resolved = Result<SymbolicValue, ErrorReason>;

const FOR_EACH_MACROS: [&str; 3] = ["ForEachLoop", "ForEachLoopWithBreak", "ReverseForEachLoop"];
const FOR_MACROS: [&str; 2] = ["ForLoop", "ForLoopWithBreak"];

fn missing(role: &str) -> SymbolicValue {
    SymbolicValue::error(ErrorReason::MissingPin {
        role: role.to_string(),
    })
}

fn nonempty<'a>(value: Option<&'a str>) -> Option<&'a str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Data inputs in declaration order, hidden pins included.
fn data_inputs<'g>(view: &NodeView<'g>) -> Vec<&'g Pin> {
    view.pins().filter(|p| p.is_input() && !p.is_exec()).collect()
}

/// Operand pins of an operator: visible data inputs sorted by name.
fn operand_pins<'g>(view: &NodeView<'g>) -> Vec<&'g Pin> {
    let mut pins: Vec<&Pin> = view
        .pins()
        .filter(|p| p.is_input() && !p.is_exec() && !p.hidden && !is_excluded_argument(&p.name))
        .collect();
    pins.sort_by(|a, b| a.name.cmp(&b.name));
    pins
}

fn is_native_pure_call(view: &NodeView<'_>) -> bool {
    let native = view
        .property("FunctionOwnerClass")
        .is_some_and(|owner| owner.contains("/Script/"));
    native && (view.is_pure() || view.flag("IsPure"))
}

/// `Call(...).Pin` for any output other than the return value.
fn with_output_member(text: StyledText, pin: &Pin) -> StyledText {
    if pin.name == "ReturnValue" {
        text
    } else {
        member(text, pin.display_name(), SpanKind::PinName)
    }
}

/// Display name of a class taken from a node property path.
fn class_property(view: &NodeView<'_>, keys: &[&str]) -> Option<StyledText> {
    keys.iter()
        .find_map(|key| nonempty(view.property(key)))
        .map(|path| StyledText::styled(SpanKind::ClassName, simple_name_from_path(path)))
}

impl<'p> Tracer<'p> {
    /// Fresh top-level resolution of one pin.
    pub(crate) fn resolve_value(&mut self, graph: &'p Graph, pin: &'p Pin) -> SymbolicValue {
        let mut visiting = Visiting::new();
        self.resolve_pin(graph, pin, 0, &mut visiting)
            .unwrap_or_else(SymbolicValue::error)
    }

    /// Resolves a pin inside an enclosing resolution.
    pub(crate) fn resolve_pin(
        &mut self,
        graph: &'p Graph,
        pin: &'p Pin,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let limit = self.config.max_resolve_depth;
        if depth > limit {
            warn!(pin = %pin.name, limit, "resolution depth exceeded");
            return Ok(SymbolicValue::error(
                ErrorReason::ResolutionDepthExceeded { limit },
            ));
        }
        let key = (graph.location.as_str(), &pin.id);
        if !visiting.insert(key) {
            return Err(ErrorReason::CyclicDataReference {
                pin: pin.display_name().to_string(),
            });
        }
        trace!(pin = %pin.name, node = %pin.node, depth, "resolving pin");
        let result = if pin.is_output() {
            self.resolve_output(graph, pin, depth, visiting)
        } else {
            self.resolve_input(graph, pin, depth, visiting)
        };
        visiting.shift_remove(&key);
        result
    }

    fn resolve_input(
        &mut self,
        graph: &'p Graph,
        pin: &'p Pin,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        match graph.source_of(pin) {
            Some(source) => self.resolve_pin(graph, source, depth, visiting),
            None => {
                if pin.is_linked() {
                    warn!(pin = %pin.name, "data link leads outside selection");
                }
                Ok(format_default(pin))
            }
        }
    }

    /// Resolves a named input of `view`, or a missing-pin error.
    fn input_value(
        &mut self,
        view: &NodeView<'p>,
        name: &str,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        match view.input(name) {
            Some(pin) => self.resolve_pin(view.graph, pin, depth, visiting),
            None => Ok(missing(name)),
        }
    }

    /// Resolves the first of several candidate inputs, falling back to the
    /// first data input when none of the names exist.
    fn preferred_input(
        &mut self,
        view: &NodeView<'p>,
        names: &[&str],
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let pin = names
            .iter()
            .find_map(|name| view.input(name))
            .or_else(|| data_inputs(view).into_iter().find(|p| !is_excluded_argument(&p.name)));
        match pin {
            Some(pin) => self.resolve_pin(view.graph, pin, depth, visiting),
            None => Ok(missing(names.first().copied().unwrap_or("input"))),
        }
    }

    fn resolve_all(
        &mut self,
        graph: &'p Graph,
        pins: &[&'p Pin],
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Result<Vec<StyledText>, ErrorReason> {
        let mut out = Vec::with_capacity(pins.len());
        for pin in pins {
            out.push(self.resolve_pin(graph, pin, depth, visiting)?.into_styled());
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Producer dispatch
    // -----------------------------------------------------------------------

    /// Resolves an output pin by its owning node's kind.
    pub(crate) fn resolve_output(
        &mut self,
        graph: &'p Graph,
        pin: &'p Pin,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let Some(view) = graph.owner_of(pin) else {
            return Ok(missing("owner node"));
        };
        let d = depth + 1;
        let expr = SymbolicValue::expression;

        match view.kind() {
            NodeKind::VariableGet => {
                let var = nonempty(view.property("VariableName")).unwrap_or(view.name());
                let mut text = StyledText::new();
                if let Some(target) = target_pin(&view).filter(|p| p.is_linked()) {
                    let receiver = self.resolve_pin(graph, target, d, visiting)?;
                    if let Some(prefix) = explicit_receiver(&receiver) {
                        text.append(prefix);
                        text.push_plain(".");
                    }
                }
                text.push(SpanKind::Variable, member_path(var, &pin.name));
                Ok(SymbolicValue::variable(text))
            }
            NodeKind::Self_ => Ok(SymbolicValue::named(SpanKind::Variable, "self")),
            NodeKind::Literal => match nonempty(view.property("ObjectRef")) {
                Some(path) if pin.default.is_empty() => Ok(SymbolicValue::literal(
                    StyledText::styled(SpanKind::LiteralObject, simple_name_from_path(path)),
                    &pin.ty,
                )),
                _ => Ok(format_default(pin)),
            },
            NodeKind::Knot => match data_inputs(&view).first() {
                Some(input) => self.resolve_pin(graph, input, depth, visiting),
                None => Ok(missing("reroute input")),
            },
            NodeKind::VariableSet => {
                let var = nonempty(view.property("VariableName")).unwrap_or(view.name());
                let name = if view.input(&pin.name).is_some() { pin.name.as_str() } else { var };
                self.preferred_input(&view, &[name], d, visiting)
            }

            NodeKind::CallFunction | NodeKind::CallParentFunction => {
                self.resolve_call_output(&view, pin, d, visiting)
            }
            NodeKind::CommutativeAssociativeBinaryOperator | NodeKind::PromotableOperator => {
                self.resolve_operator(&view, function_name(&view), d, visiting)
            }
            NodeKind::CallArrayFunction => self.resolve_array_function(&view, d, visiting),
            NodeKind::Message => {
                let text = self.nested_call(&view, d, visiting)?;
                Ok(expr(with_output_member(text, pin)))
            }
            NodeKind::MacroInstance | NodeKind::Composite => {
                self.resolve_subgraph_output(&view, pin, d, visiting)
            }

            NodeKind::FunctionEntry | NodeKind::Tunnel => {
                match self.state.binding_for(&graph.location, &pin.name) {
                    Some(bound) => Ok(bound.clone()),
                    None => Ok(SymbolicValue::named(SpanKind::ParamName, pin.display_name())),
                }
            }
            kind if kind.is_event() => {
                let text = self
                    .event_title(&view, None)
                    .with_plain(".")
                    .with(SpanKind::ParamName, pin.display_name());
                Ok(SymbolicValue::variable(text))
            }

            NodeKind::BreakStruct => {
                let source = self.preferred_input(&view, &[], d, visiting)?;
                Ok(expr(member(source.as_receiver(), pin.display_name(), SpanKind::PinName)))
            }
            NodeKind::MakeStruct => {
                let ty = self.struct_type_name(&view, pin);
                let pins: Vec<&Pin> = data_inputs(&view).into_iter().filter(|p| !p.hidden).collect();
                let args = self.named_values(graph, &pins, d, visiting)?;
                Ok(expr(call(&format!("Make{ty}"), args)))
            }
            NodeKind::SetFieldsInStruct => {
                let ty = self.struct_type_name(&view, pin);
                let struct_pin = view
                    .input("StructRef")
                    .or_else(|| data_inputs(&view).into_iter().next());
                let Some(struct_pin) = struct_pin else {
                    return Ok(missing("StructRef"));
                };
                let source = self.resolve_pin(graph, struct_pin, d, visiting)?;
                let fields = self.argument_pins(&view, &[struct_pin.name.as_str()]);
                let args = self.named_values(graph, &fields, d, visiting)?;
                let inner = source
                    .into_styled()
                    .with_plain(" ")
                    .with(SpanKind::Keyword, "with")
                    .with_plain(" ")
                    .with_text(StyledText::join(args, ", "));
                Ok(expr(
                    StyledText::styled(SpanKind::FunctionName, format!("SetFields{ty}"))
                        .with_text(StyledText::parenthesized(inner)),
                ))
            }

            NodeKind::MakeArray => {
                let items = self.resolve_all(graph, &data_inputs(&view), d, visiting)?;
                Ok(expr(
                    StyledText::plain("[")
                        .with_text(StyledText::join(items, ", "))
                        .with_plain("]"),
                ))
            }
            NodeKind::GetArrayItem => {
                let inputs = data_inputs(&view);
                let array_pin = view
                    .input("Array")
                    .or_else(|| view.input("TargetArray"))
                    .or_else(|| inputs.iter().copied().find(|p| p.ty.container == ContainerKind::Array));
                let Some(array_pin) = array_pin else {
                    return Ok(SymbolicValue::error(ErrorReason::ArrayInputMissing));
                };
                let array = self.resolve_pin(graph, array_pin, d, visiting)?;
                let index = match inputs.iter().copied().find(|p| p.id != array_pin.id) {
                    Some(index_pin) => self.resolve_pin(graph, index_pin, d, visiting)?,
                    None => missing("Index"),
                };
                Ok(expr(
                    array
                        .as_receiver()
                        .with_plain("[")
                        .with_text(index.into_styled())
                        .with_plain("]"),
                ))
            }
            NodeKind::MakeMap => {
                let items = self.resolve_all(graph, &data_inputs(&view), d, visiting)?;
                let mut pairs = Vec::new();
                let mut iter = items.into_iter();
                while let Some(key) = iter.next() {
                    let value = iter.next().unwrap_or_else(|| StyledText::styled(SpanKind::Info, "?"));
                    pairs.push(key.with_plain(": ").with_text(value));
                }
                Ok(expr(
                    StyledText::plain("{")
                        .with_text(StyledText::join(pairs, ", "))
                        .with_plain("}"),
                ))
            }
            NodeKind::MakeSet => {
                let items = self.resolve_all(graph, &data_inputs(&view), d, visiting)?;
                Ok(expr(
                    StyledText::plain("{")
                        .with_text(StyledText::join(items, ", "))
                        .with_plain("}"),
                ))
            }
            NodeKind::CreateDelegate => {
                let func = nonempty(view.property("FunctionName"))
                    .or_else(|| nonempty(view.property("SelectedFunctionName")))
                    .unwrap_or("?");
                Ok(expr(call_with(
                    StyledText::styled(SpanKind::Keyword, "Delegate"),
                    vec![StyledText::styled(SpanKind::FunctionName, func)],
                )))
            }
            NodeKind::Select => {
                let inputs = data_inputs(&view);
                let index_pin = view.input("Index").or_else(|| inputs.first().copied());
                let Some(index_pin) = index_pin else {
                    return Ok(missing("Index"));
                };
                let index = self.resolve_pin(graph, index_pin, d, visiting)?;
                let options: Vec<&Pin> =
                    inputs.into_iter().filter(|p| p.id != index_pin.id).collect();
                let options = self.resolve_all(graph, &options, d, visiting)?;
                let options = StyledText::plain("{")
                    .with_text(StyledText::join(options, ", "))
                    .with_plain("}");
                Ok(expr(call(
                    "Select",
                    vec![
                        crate::expr::argument("Index", index.into_styled()),
                        crate::expr::argument("Options", options),
                    ],
                )))
            }

            NodeKind::SpawnActorFromClass => {
                let class = self.class_text(&view, d, visiting)?;
                Ok(expr(call_with(StyledText::styled(SpanKind::FunctionName, "SpawnedActor"), vec![class])))
            }
            NodeKind::AddComponent => {
                let class = self.class_text(&view, d, visiting)?;
                Ok(expr(call_with(StyledText::styled(SpanKind::FunctionName, "AddedComponent"), vec![class])))
            }
            NodeKind::CreateWidget => {
                let class = self.class_text(&view, d, visiting)?;
                Ok(expr(call_with(StyledText::styled(SpanKind::FunctionName, "CreatedWidget"), vec![class])))
            }
            NodeKind::GenericCreateObject => {
                let class = self.class_text(&view, d, visiting)?;
                Ok(expr(call_with(StyledText::styled(SpanKind::FunctionName, "CreatedObject"), vec![class])))
            }
            NodeKind::DynamicCast => {
                let object = self.preferred_input(&view, &["Object"], d, visiting)?;
                if pin.ty.category == PinCategory::Bool {
                    return Ok(expr(call("CastSucceeded", vec![object.into_styled()])));
                }
                let ty = self.cast_type_name(&view, pin);
                Ok(expr(
                    StyledText::styled(SpanKind::Keyword, "Cast")
                        .with_plain("<")
                        .with(SpanKind::DataType, ty)
                        .with_plain(">")
                        .with_text(StyledText::parenthesized(object.into_styled())),
                ))
            }

            NodeKind::EnumEquality | NodeKind::EnumInequality => {
                let a = self.input_value(&view, "A", d, visiting)?;
                let b = self.input_value(&view, "B", d, visiting)?;
                let symbol = if view.kind() == &NodeKind::EnumEquality { "==" } else { "!=" };
                Ok(expr(binary(a.into_styled(), symbol, b.into_styled())))
            }
            NodeKind::CastByteToEnum => {
                let byte = self.preferred_input(&view, &["Byte"], d, visiting)?;
                let enum_name = nonempty(view.property("Enum"))
                    .map(simple_name_from_path)
                    .or_else(|| pin.ty.enum_name())
                    .unwrap_or_else(|| "Enum".to_string());
                Ok(expr(
                    StyledText::styled(SpanKind::Keyword, "Cast")
                        .with_plain("<")
                        .with(SpanKind::EnumType, enum_name)
                        .with_plain(">")
                        .with_text(StyledText::parenthesized(byte.into_styled())),
                ))
            }
            NodeKind::EnumLiteral => self.preferred_input(&view, &["Enum"], d, visiting),
            NodeKind::GetClassDefaults => {
                let class = match class_property(&view, &["ClassPath"]) {
                    Some(class) => class,
                    None => self.input_value(&view, "Class", d, visiting)?.as_receiver(),
                };
                Ok(expr(member(class, pin.display_name(), SpanKind::PinName)))
            }
            NodeKind::GetSubsystem => {
                let class = match class_property(&view, &["SubsystemClass", "ClassPath"]) {
                    Some(class) => class,
                    None => self.class_text(&view, d, visiting)?,
                };
                Ok(expr(call("GetSubsystem", vec![class])))
            }

            NodeKind::Timeline => {
                let name = nonempty(view.property("TimelineName")).unwrap_or(view.name());
                Ok(expr(member(
                    StyledText::styled(SpanKind::TimelineName, name),
                    pin.display_name(),
                    SpanKind::PinName,
                )))
            }
            NodeKind::Delay | NodeKind::AIMoveTo | NodeKind::MoveComponentTo | NodeKind::PlayMontage => {
                let action = match view.kind() {
                    NodeKind::AIMoveTo => "AI MoveTo",
                    NodeKind::PlayMontage => "PlayMontage",
                    NodeKind::MoveComponentTo => "MoveComponentTo",
                    _ => function_name(&view),
                };
                let args = self.nested_arguments(&view, &[], d, visiting)?;
                Ok(expr(member(call(action, args), pin.display_name(), SpanKind::PinName)))
            }
            NodeKind::FormatText => {
                let format = self.input_value(&view, "Format", d, visiting)?;
                let args = self.nested_arguments(&view, &["Format"], d, visiting)?;
                let args = StyledText::plain("{")
                    .with_text(StyledText::join(args, ", "))
                    .with_plain("}");
                Ok(expr(call(
                    "FormatText",
                    vec![
                        crate::expr::argument("Format", format.into_styled()),
                        crate::expr::argument("Args", args),
                    ],
                )))
            }
            NodeKind::GetDataTableRow => {
                let table = self.input_value(&view, "DataTable", d, visiting)?;
                let row = self.input_value(&view, "RowName", d, visiting)?;
                let lookup = table
                    .into_styled()
                    .with_plain("[")
                    .with_text(row.into_styled())
                    .with_plain("]");
                Ok(expr(member(
                    StyledText::parenthesized(lookup),
                    pin.display_name(),
                    SpanKind::PinName,
                )))
            }

            other => {
                warn!(kind = %other, node = %view.id(), "no resolver for node kind");
                Ok(SymbolicValue::error(ErrorReason::UnsupportedNodeKind {
                    kind: other.to_string(),
                }))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Calls and operators
    // -----------------------------------------------------------------------

    fn resolve_call_output(
        &mut self,
        view: &NodeView<'p>,
        pin: &'p Pin,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let func = function_name(view);
        let graph = view.graph;

        if let Some(name) = conversion_name(func) {
            let operand = match operand_pins(view).first() {
                Some(input) => self.resolve_pin(graph, input, depth, visiting)?,
                None => missing("conversion input"),
            };
            return Ok(SymbolicValue::expression(call(&name, vec![operand.into_styled()])));
        }
        if let Some(symbol) = unary_symbol(func) {
            let operand = match operand_pins(view).first() {
                Some(input) => self.resolve_pin(graph, input, depth, visiting)?,
                None => missing("operand"),
            };
            return Ok(SymbolicValue::expression(unary(symbol, operand.into_styled())));
        }
        if is_native_pure_call(view) {
            let base = operation_base(func);
            if operator_symbol(func).is_some() {
                return self.resolve_operator(view, func, depth, visiting);
            }
            if base.starts_with("Select") && view.input("bPickA").is_some() {
                let condition = self.input_value(view, "bPickA", depth, visiting)?;
                let a = self.input_value(view, "A", depth, visiting)?;
                let b = self.input_value(view, "B", depth, visiting)?;
                return Ok(SymbolicValue::expression(select(
                    condition.into_styled(),
                    a.into_styled(),
                    b.into_styled(),
                )));
            }
            if func.starts_with("MakeLiteral") {
                return self.preferred_input(view, &["Value"], depth, visiting);
            }
        }

        let text = self.nested_call(view, depth, visiting)?;
        Ok(SymbolicValue::expression(with_output_member(text, pin)))
    }

    /// Binary, n-ary or fallback-call rendering of an operator node.
    fn resolve_operator(
        &mut self,
        view: &NodeView<'p>,
        func: &str,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let operands = self.resolve_all(view.graph, &operand_pins(view), depth, visiting)?;
        let base = operation_base(func);
        let text = match operator_symbol(func) {
            Some(symbol) if base == "Concat" || operands.len() > 2 => nary(operands, symbol),
            Some(symbol) if operands.len() == 2 => {
                let mut iter = operands.into_iter();
                match (iter.next(), iter.next()) {
                    (Some(lhs), Some(rhs)) => binary(lhs, symbol, rhs),
                    _ => call(base, Vec::new()),
                }
            }
            _ => call(base, operands),
        };
        Ok(SymbolicValue::expression(text))
    }

    fn resolve_array_function(
        &mut self,
        view: &NodeView<'p>,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let func = function_name(view);
        let op = func.strip_prefix("Array_").unwrap_or(func);
        let inputs = data_inputs(view);
        let array_pin = view
            .input("TargetArray")
            .or_else(|| inputs.iter().copied().find(|p| p.ty.container == ContainerKind::Array));
        let Some(array_pin) = array_pin else {
            return Ok(SymbolicValue::error(ErrorReason::ArrayInputMissing));
        };
        let array = self.resolve_pin(view.graph, array_pin, depth, visiting)?.as_receiver();
        let rest: Vec<&Pin> = inputs
            .into_iter()
            .filter(|p| p.id != array_pin.id && !is_excluded_argument(&p.name))
            .collect();
        let text = match op {
            "Length" => array.with_plain(".").with_text(call("Length", Vec::new())),
            "Contains" | "Find" | "IsValidIndex" => {
                let args = self.resolve_all(view.graph, &rest, depth, visiting)?;
                array.with_plain(".").with_text(call(op, args))
            }
            _ => {
                let args = self.named_values(view.graph, &rest, depth, visiting)?;
                call_with(
                    StyledText::styled(SpanKind::Keyword, "ResultOf"),
                    vec![array.with_plain(".").with_text(call(op, args))],
                )
            }
        };
        Ok(SymbolicValue::expression(text))
    }

    // -----------------------------------------------------------------------
    // Macros and collapsed graphs
    // -----------------------------------------------------------------------

    fn resolve_subgraph_output(
        &mut self,
        view: &NodeView<'p>,
        pin: &'p Pin,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let Some(reference) = identify(view) else {
            return Ok(missing("macro reference"));
        };
        if reference.native {
            return self.resolve_standard_macro(view, &reference, pin, depth, visiting);
        }
        if !self.config.symbolic {
            if let Some(sub) = self.provider.graph(&reference.location) {
                return self.descend(view, sub, pin, depth, visiting);
            }
        }
        let name = self.reference_name(&reference, SpanKind::MacroName);
        let args = self.nested_arguments(view, &[], depth, visiting)?;
        Ok(SymbolicValue::expression(member(
            call_with(name, args),
            pin.display_name(),
            SpanKind::PinName,
        )))
    }

    fn resolve_standard_macro(
        &mut self,
        view: &NodeView<'p>,
        reference: &SubgraphReference,
        pin: &'p Pin,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let name = reference.item_name();
        let loop_var = |text: &str| Ok(SymbolicValue::named(SpanKind::Variable, text));
        if FOR_EACH_MACROS.contains(&name) {
            match pin.name.as_str() {
                "Array Element" => return loop_var("Loop Element"),
                "Array Index" => return loop_var("Loop Index"),
                _ => {}
            }
        }
        if FOR_MACROS.contains(&name) && pin.name == "Index" {
            return loop_var("Loop Index");
        }
        if name == "FlipFlop" && pin.name == "IsA" {
            return loop_var("FlipFlop.IsA");
        }
        let args = self.nested_arguments(view, &[], depth, visiting)?;
        Ok(SymbolicValue::expression(call_with(
            StyledText::styled(SpanKind::MacroName, name),
            args,
        )))
    }

    /// Continues resolution inside a sub-graph: binds the call node's inputs
    /// to the sub-graph's entry parameters, then resolves the exit tunnel's
    /// pin with the requested output's name.
    fn descend(
        &mut self,
        view: &NodeView<'p>,
        sub: &'p Graph,
        pin: &'p Pin,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Resolved {
        let exit_pin = sub
            .nodes()
            .filter(|n| n.kind() == &NodeKind::Tunnel)
            .find_map(|n| n.input(&pin.name));
        let Some(exit_pin) = exit_pin else {
            return Ok(missing(&pin.name));
        };

        let mut values = IndexMap::new();
        for input in data_inputs(view) {
            let value = self.resolve_pin(view.graph, input, depth, visiting)?;
            values.insert(input.name.clone(), value);
        }
        self.state.push_binding(CallSiteBinding {
            location: sub.location.clone(),
            values,
        });
        let result = self.resolve_pin(sub, exit_pin, depth, visiting);
        self.state.pop_binding();
        result
    }

    // -----------------------------------------------------------------------
    // Type and class names
    // -----------------------------------------------------------------------

    fn struct_type_name(&self, view: &NodeView<'p>, pin: &Pin) -> String {
        nonempty(view.property("StructType"))
            .map(simple_name_from_path)
            .or_else(|| pin.ty.struct_name())
            .unwrap_or_else(|| "Struct".to_string())
    }

    fn cast_type_name(&self, view: &NodeView<'p>, pin: &Pin) -> String {
        if let Some(path) = nonempty(view.property("TargetType")) {
            return simple_name_from_path(path);
        }
        if !pin.ty.sub_category_object.is_empty() {
            return simple_name_from_path(&pin.ty.sub_category_object);
        }
        pin.name
            .strip_prefix("As ")
            .unwrap_or(&pin.name)
            .to_string()
    }

    /// Class operand of an object-creation node: the class input's object
    /// default or resolved value, else a recorded class path.
    pub(crate) fn class_text(
        &mut self,
        view: &NodeView<'p>,
        depth: usize,
        visiting: &mut Visiting<'p>,
    ) -> Result<StyledText, ErrorReason> {
        let class_pin = ["Class", "WidgetType", "ObjectClass"]
            .iter()
            .find_map(|name| view.input(name));
        if let Some(class_pin) = class_pin {
            if !class_pin.is_linked() {
                if let Some(path) = nonempty(class_pin.default.object.as_deref())
                    .or_else(|| nonempty(class_pin.default.value.as_deref()))
                {
                    return Ok(StyledText::styled(SpanKind::ClassName, simple_name_from_path(path)));
                }
            } else {
                return Ok(self.resolve_pin(view.graph, class_pin, depth, visiting)?.into_styled());
            }
        }
        Ok(class_property(view, &["ClassPath", "TemplateType"])
            .unwrap_or_else(|| StyledText::styled(SpanKind::Info, "?")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bpflow_core::{GraphBuilder, NodeId, PinType};
    use bpflow_store::InMemoryProvider;

    use crate::config::TraceConfig;

    const LOC: &str = "/Game/A:EventGraph";
    const MATH: &str = "/Script/Engine.KismetMathLibrary";

    fn float() -> PinType {
        PinType::new(PinCategory::Float)
    }

    fn getter(b: &mut GraphBuilder, name: &str) -> PinId {
        let n = b.node(NodeKind::VariableGet, name);
        b.prop(&n, "VariableName", name);
        b.output(&n, name, float())
    }

    fn math(b: &mut GraphBuilder, func: &str) -> (NodeId, PinId, PinId, PinId) {
        let n = b.node(NodeKind::CallFunction, func);
        b.prop(&n, "FunctionName", func).prop(&n, "FunctionOwnerClass", MATH);
        let a = b.input(&n, "A", float());
        let bb = b.input(&n, "B", float());
        let out = b.output(&n, "ReturnValue", float());
        (n, a, bb, out)
    }

    fn resolve(graph: bpflow_core::Graph, pin: &PinId) -> String {
        let provider = InMemoryProvider::new().with_graph(graph);
        let mut tracer = Tracer::new(&provider, TraceConfig::default());
        tracer.resolve(LOC, pin).unwrap().to_styled().to_string()
    }

    #[test]
    fn operators_compose() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let x = getter(&mut b, "X");
        let y = getter(&mut b, "Y");
        let (_, a, bb, add) = math(&mut b, "Add_DoubleDouble");
        b.link(&x, &a).link(&y, &bb);
        let (_, a2, b2, mul) = math(&mut b, "Multiply_DoubleDouble");
        b.link(&add, &a2);
        b.value(&b2, "2.0");
        let g = b.build().unwrap();
        assert_eq!(resolve(g, &mul), "((X + Y) * 2)");
    }

    #[test]
    fn shared_producer_is_not_a_cycle() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let x = getter(&mut b, "X");
        let (_, a, bb, out) = math(&mut b, "Add_DoubleDouble");
        b.link(&x, &a).link(&x, &bb);
        let g = b.build().unwrap();
        assert_eq!(resolve(g, &out), "(X + X)");
    }

    #[test]
    fn data_cycle_is_an_error() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let (_, a1, b1, out1) = math(&mut b, "Add_DoubleDouble");
        let (_, a2, _, out2) = math(&mut b, "Multiply_DoubleDouble");
        b.link(&out1, &a2).link(&out2, &a1);
        b.value(&b1, "1");
        let g = b.build().unwrap();
        let text = resolve(g, &out1);
        assert!(text.starts_with("[ERROR: cyclic data reference"), "{text}");
    }

    #[test]
    fn unlinked_inputs_use_defaults() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let (_, a, bb, out) = math(&mut b, "Subtract_DoubleDouble");
        b.value(&a, "10.50").value(&bb, "0.25");
        let g = b.build().unwrap();
        assert_eq!(resolve(g, &out), "(10.5 - 0.25)");
    }

    #[test]
    fn concat_is_nary_and_conversions_wrap() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let s = PinType::new(PinCategory::String);
        let concat = b.node(NodeKind::CommutativeAssociativeBinaryOperator, "Append");
        b.prop(&concat, "FunctionName", "Concat_StrStr");
        let a = b.input(&concat, "A", s.clone());
        let bb = b.input(&concat, "B", s.clone());
        let c = b.input(&concat, "C", s.clone());
        let out = b.output(&concat, "ReturnValue", s.clone());
        b.value(&a, "Score: ");
        let conv = b.node(NodeKind::CallFunction, "ToString (Integer)");
        b.prop(&conv, "FunctionName", "Conv_IntToString");
        let conv_in = b.input(&conv, "InInt", PinType::new(PinCategory::Int));
        let conv_out = b.output(&conv, "ReturnValue", s.clone());
        let score = b.node(NodeKind::VariableGet, "Score");
        let score_out = b.output(&score, "Score", PinType::new(PinCategory::Int));
        b.link(&score_out, &conv_in).link(&conv_out, &bb);
        b.value(&c, "!");
        let g = b.build().unwrap();
        assert_eq!(resolve(g, &out), "(\"Score: \" + ToString(Score) + \"!\")");
    }

    #[test]
    fn unsupported_producers_are_errors() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let odd = b.node(NodeKind::Other("Mystery".into()), "Mystery");
        let out = b.output(&odd, "Out", float());
        let g = b.build().unwrap();
        assert_eq!(
            resolve(g, &out),
            "[ERROR: unsupported node kind (Mystery)]"
        );
    }

    #[test]
    fn array_item_without_array_is_an_error() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let get = b.node(NodeKind::GetArrayItem, "Get");
        b.input(&get, "Index", PinType::new(PinCategory::Int));
        let out = b.output(&get, "Output", float());
        let g = b.build().unwrap();
        assert_eq!(resolve(g, &out), "[ERROR: array input missing]");
    }

    #[test]
    fn depth_ceiling_is_reported() {
        let mut b = GraphBuilder::new(LOC, "EventGraph", "A");
        let mut prev = getter(&mut b, "X");
        for _ in 0..6 {
            let (_, a, bb, out) = math(&mut b, "Add_DoubleDouble");
            b.link(&prev, &a);
            b.value(&bb, "1");
            prev = out;
        }
        let g = b.build().unwrap();
        let provider = InMemoryProvider::new().with_graph(g);
        let config = TraceConfig {
            max_resolve_depth: 3,
            ..TraceConfig::default()
        };
        let mut tracer = Tracer::new(&provider, config);
        let text = tracer.resolve(LOC, &prev).unwrap().to_styled().to_string();
        assert!(text.contains("[ERROR: resolution depth exceeded (3)]"), "{text}");
        assert!(text.starts_with("((("), "{text}");
    }
}
