//! One-line step descriptions, one match arm per executable node kind.

use bpflow_core::types::simple_name_from_path;
use bpflow_core::{Graph, NodeKind, NodeView, Pin, PinCategory};

use crate::args::{explicit_receiver, on_receiver, target_pin};
use crate::expr::{argument, call, call_with};
use crate::names::event_display_name;
use crate::resolve::Visiting;
use crate::span::{SpanKind, StyledText};
use crate::tracer::Tracer;
use crate::value::SymbolicValue;
use crate::xref::{function_name, identify, SubgraphKind};

const LATENT: &str = " [(Latent)]";

/// Bound-event identity supplied by the caller when the node itself does
/// not record it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedEventData {
    pub delegate_name: String,
    pub component_name: String,
    /// Class path of the object owning the delegate.
    pub owner_class: String,
}

fn keyword(text: &str) -> StyledText {
    StyledText::styled(SpanKind::Keyword, text)
}

fn property<'g>(view: &NodeView<'g>, key: &str) -> Option<&'g str> {
    view.property(key).map(str::trim).filter(|v| !v.is_empty())
}

fn or_captured<'a>(
    view: &NodeView<'a>,
    key: &str,
    captured: Option<&'a str>,
    fallback: &'a str,
) -> &'a str {
    property(view, key)
        .or_else(|| captured.filter(|c| !c.is_empty()))
        .unwrap_or(fallback)
}

/// `(p: type, …)` over the visible data outputs, skipping delegate pins.
fn signature_list(view: &NodeView<'_>) -> Option<StyledText> {
    let params: Vec<StyledText> = view
        .data_outputs()
        .filter(|p| !p.hidden)
        .filter(|p| !matches!(p.ty.category, PinCategory::Delegate | PinCategory::MulticastDelegate))
        .map(|p| {
            StyledText::styled(SpanKind::ParamName, p.display_name())
                .with_plain(": ")
                .with(SpanKind::DataType, p.ty.signature())
        })
        .collect();
    (!params.is_empty()).then(|| StyledText::parenthesized(StyledText::join(params, ", ")))
}

/// Item name of an engine-provided macro, such as `ForEachLoop`.
pub(crate) fn standard_macro_name(view: &NodeView<'_>) -> Option<String> {
    if view.kind() != &NodeKind::MacroInstance {
        return None;
    }
    identify(view)
        .filter(|r| r.native)
        .map(|r| r.item_name().to_string())
}

fn for_each_label(name: &str) -> Option<&'static str> {
    match name {
        "ForEachLoop" => Some("For Each"),
        "ForEachLoopWithBreak" => Some("For Each Loop with Break"),
        "ReverseForEachLoop" => Some("Reverse For Each"),
        _ => None,
    }
}

impl<'p> Tracer<'p> {
    /// Describes one executable node. Pure and pass-through nodes describe
    /// to empty text; they never form a step on their own.
    pub(crate) fn describe_step(
        &mut self,
        graph: &'p Graph,
        view: &NodeView<'p>,
        captured: Option<&CapturedEventData>,
    ) -> StyledText {
        let kind = view.kind();
        if kind.is_passthrough() || view.is_pure() {
            return StyledText::new();
        }

        match kind {
            k if k.is_event() => self.describe_event(view, captured),
            NodeKind::FunctionEntry => {
                let name = property(view, "FunctionName").unwrap_or(graph.name.as_str());
                let mut text = keyword("Function Entry")
                    .with_plain(" ")
                    .with(SpanKind::FunctionName, name);
                if let Some(args) = signature_list(view) {
                    text.push_plain(" Args: ");
                    text.append(args);
                }
                text
            }
            NodeKind::Tunnel => self.describe_tunnel(graph, view),
            NodeKind::FunctionResult => {
                call_with(keyword("Return"), self.describe_arguments(graph, view, &[]))
            }
            NodeKind::VariableSet => self.describe_variable_set(graph, view),

            NodeKind::CallFunction => match identify(view) {
                Some(r) if r.kind == SubgraphKind::Interface => {
                    self.describe_interface_call(graph, view)
                }
                _ => self.describe_call(graph, view),
            },
            NodeKind::CallParentFunction => {
                let name = self.call_name(view);
                let args = self.describe_arguments(graph, view, &[]);
                keyword("Call Parent").with_plain(" ").with_text(call_with(name, args))
            }
            NodeKind::Message => self.describe_interface_call(graph, view),
            NodeKind::CallArrayFunction => {
                let func = function_name(view);
                let array_pin = view.input("TargetArray").or_else(|| {
                    view.data_inputs()
                        .into_iter()
                        .find(|p| p.ty.container == bpflow_core::ContainerKind::Array)
                });
                let extra: Vec<&str> = array_pin.iter().map(|p| p.name.as_str()).collect();
                let args = self.describe_arguments(graph, view, &extra);
                let mut text = keyword("Array Op")
                    .with_plain(" ")
                    .with_text(call(func.strip_prefix("Array_").unwrap_or(func), args));
                if let Some(pin) = array_pin {
                    let array = self.resolve_value(graph, pin).into_styled();
                    text.push_plain(" on ");
                    text.append(StyledText::parenthesized(array));
                }
                text
            }

            NodeKind::IfThenElse => {
                let condition = self.value_of(graph, view, &["Condition"]);
                keyword("If").with_plain(" ").with_text(StyledText::parenthesized(condition))
            }
            NodeKind::SwitchEnum | NodeKind::SwitchInteger | NodeKind::SwitchString | NodeKind::SwitchName => {
                let selection = self.value_of(graph, view, &["Selection"]);
                let mut text = keyword("Switch on").with_plain(" ");
                match kind {
                    NodeKind::SwitchEnum => {
                        let enum_name = property(view, "Enum")
                            .map(simple_name_from_path)
                            .or_else(|| view.input("Selection").and_then(|p| p.ty.enum_name()))
                            .unwrap_or_else(|| "?".to_string());
                        text.push(SpanKind::Keyword, "Enum");
                        text.push_plain(" ");
                        text.push(SpanKind::EnumType, enum_name);
                    }
                    NodeKind::SwitchInteger => {
                        text.push(SpanKind::DataType, "Integer");
                    }
                    NodeKind::SwitchString => {
                        text.push(SpanKind::DataType, "String");
                    }
                    _ => {
                        text.push(SpanKind::DataType, "Name");
                    }
                }
                text.with_plain(" ").with_text(StyledText::parenthesized(selection))
            }
            NodeKind::ExecutionSequence => keyword("Sequence"),
            NodeKind::MultiGate => keyword("MultiGate"),
            NodeKind::DynamicCast => {
                let object = self.value_of(graph, view, &["Object"]);
                let target = property(view, "TargetType")
                    .map(simple_name_from_path)
                    .unwrap_or_else(|| "?".to_string());
                keyword("Cast")
                    .with_plain(" ")
                    .with_text(object)
                    .with_plain(" ")
                    .with(SpanKind::Keyword, "to")
                    .with_plain(" ")
                    .with(SpanKind::DataType, target)
            }
            NodeKind::MacroInstance => self.describe_macro(graph, view),
            NodeKind::Composite => match identify(view) {
                Some(reference) => keyword("Collapsed Graph")
                    .with_plain(": ")
                    .with_text(self.reference_name(&reference, SpanKind::GraphName)),
                None => self.fallback(view),
            },

            NodeKind::AddDelegate | NodeKind::RemoveDelegate => {
                let event = self.delegate_source(graph, view);
                let receiver = self.describe_receiver(graph, view);
                let (verb, prep) = if kind == &NodeKind::AddDelegate {
                    ("Bind Event", "to")
                } else {
                    ("Unbind Event", "from")
                };
                keyword(verb)
                    .with_plain(" ")
                    .with_text(event)
                    .with_plain(" ")
                    .with(SpanKind::Keyword, prep)
                    .with_plain(" ")
                    .with(SpanKind::DelegateName, self.delegate_name(view))
                    .with_text(on_receiver(&receiver))
            }
            NodeKind::ClearDelegate => {
                let receiver = self.describe_receiver(graph, view);
                keyword("Unbind All from")
                    .with_plain(" ")
                    .with(SpanKind::DelegateName, self.delegate_name(view))
                    .with_text(on_receiver(&receiver))
            }
            NodeKind::AssignDelegate => {
                let event = self.delegate_source(graph, view);
                keyword("Assign")
                    .with_plain(" ")
                    .with(SpanKind::DelegateName, self.delegate_name(view))
                    .with_plain(" = ")
                    .with_text(event)
            }
            NodeKind::CallDelegate => {
                let receiver = self.describe_receiver(graph, view);
                let args = self.describe_arguments(graph, view, &[]);
                let name = StyledText::styled(SpanKind::DelegateName, self.delegate_name(view));
                keyword("Call Delegate")
                    .with_plain(" ")
                    .with_text(call_with(name, args))
                    .with_text(on_receiver(&receiver))
            }

            NodeKind::Timeline => {
                let name = property(view, "TimelineName").unwrap_or(view.name());
                keyword("Timeline").with_plain(": ").with(SpanKind::TimelineName, name)
            }
            NodeKind::SetFieldsInStruct => {
                let struct_pin = view.input("StructRef").or_else(|| view.data_inputs().into_iter().next());
                let extra: Vec<&str> = struct_pin.iter().map(|p| p.name.as_str()).collect();
                let target = match struct_pin {
                    Some(pin) => self.resolve_value(graph, pin).into_styled(),
                    None => SymbolicValue::error(crate::error::ErrorReason::MissingPin {
                        role: "StructRef".to_string(),
                    })
                    .into_styled(),
                };
                let fields = self.describe_arguments(graph, view, &extra);
                keyword("Set Fields in")
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(target))
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(StyledText::join(fields, ", ")))
            }

            NodeKind::SpawnActorFromClass => {
                let class = self.class_of(view);
                let transform = self.value_of(graph, view, &["SpawnTransform"]);
                let args = self.describe_arguments(graph, view, &["Class", "SpawnTransform"]);
                keyword("Spawn Actor")
                    .with_plain(" ")
                    .with_text(class)
                    .with_plain(" ")
                    .with(SpanKind::Keyword, "at")
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(transform))
                    .with_text(StyledText::parenthesized(StyledText::join(args, ", ")))
            }
            NodeKind::AddComponent => {
                let class = self.class_of(view);
                let args = self.describe_arguments(graph, view, &["Class", "TemplateType"]);
                keyword("Add Component")
                    .with_plain(" ")
                    .with_text(call_with(class, args))
            }
            NodeKind::CreateWidget => {
                let class = self.class_of(view);
                let owner = self.value_of(graph, view, &["OwningPlayer"]);
                let args = self.describe_arguments(graph, view, &["Class", "WidgetType", "OwningPlayer"]);
                keyword("Create Widget")
                    .with_plain(" ")
                    .with_text(class)
                    .with_plain(" ")
                    .with(SpanKind::Keyword, "for")
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(owner))
                    .with_text(StyledText::parenthesized(StyledText::join(args, ", ")))
            }
            NodeKind::GenericCreateObject => {
                let class = self.class_of(view);
                let outer = self.value_of(graph, view, &["Outer"]);
                let args = self.describe_arguments(graph, view, &["Class", "Outer"]);
                keyword("Create Object")
                    .with_plain(" ")
                    .with_text(class)
                    .with_plain(" ")
                    .with_text(argument("Outer", StyledText::parenthesized(outer)))
                    .with_text(StyledText::parenthesized(StyledText::join(args, ", ")))
            }

            NodeKind::FormatText => {
                let format = self.value_of(graph, view, &["Format"]);
                let args = self.describe_arguments(graph, view, &["Format"]);
                keyword("Format Text")
                    .with_plain(" ")
                    .with_text(format)
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(StyledText::join(args, ", ")))
            }
            NodeKind::PlayMontage => {
                let montage = self.value_of(graph, view, &["MontageToPlay"]);
                let receiver = match view.input("InSkeletalMeshComponent").or_else(|| target_pin(view)) {
                    Some(pin) if pin.is_linked() => self.resolve_value(graph, pin),
                    _ => SymbolicValue::named(SpanKind::Variable, "self"),
                };
                let args = self.describe_arguments(graph, view, &["MontageToPlay", "InSkeletalMeshComponent"]);
                keyword("Play Montage")
                    .with_plain(" ")
                    .with_text(montage)
                    .with_text(on_receiver(&receiver))
                    .with_text(StyledText::parenthesized(StyledText::join(args, ", ")))
                    .with(SpanKind::Modifier, LATENT)
            }
            NodeKind::Delay | NodeKind::AIMoveTo | NodeKind::MoveComponentTo => {
                let action = match kind {
                    NodeKind::AIMoveTo => "AI MoveTo",
                    NodeKind::MoveComponentTo => "MoveComponentTo",
                    _ => function_name(view),
                };
                let args = self.describe_arguments(graph, view, &[]);
                keyword("Latent Action")
                    .with_plain(" ")
                    .with_text(call(action, args))
                    .with(SpanKind::Modifier, LATENT)
            }
            NodeKind::GetDataTableRow => {
                let table = self.value_of(graph, view, &["DataTable"]);
                let row = self.value_of(graph, view, &["RowName"]);
                keyword("Get Data Table Row from")
                    .with_plain(" ")
                    .with_text(table)
                    .with_plain(" (")
                    .with(SpanKind::ParamName, "Row")
                    .with_plain(": ")
                    .with_text(row)
                    .with_plain(")")
            }

            _ => self.fallback(view),
        }
    }

    /// Event name as used in step lines and in `Event.Param` values.
    pub(crate) fn event_title(
        &self,
        view: &NodeView<'p>,
        captured: Option<&CapturedEventData>,
    ) -> StyledText {
        match view.kind() {
            NodeKind::ComponentBoundEvent => {
                let delegate = or_captured(
                    view,
                    "DelegatePropertyName",
                    captured.map(|c| c.delegate_name.as_str()),
                    "?Delegate?",
                );
                let component = or_captured(
                    view,
                    "ComponentPropertyName",
                    captured.map(|c| c.component_name.as_str()),
                    "?Component?",
                );
                let owner = or_captured(
                    view,
                    "DelegateOwnerClass",
                    captured.map(|c| c.owner_class.as_str()),
                    "?Owner?",
                );
                StyledText::styled(SpanKind::DelegateName, delegate)
                    .with_plain(" (")
                    .with(SpanKind::ComponentName, component)
                    .with_plain(" on ")
                    .with(SpanKind::ClassName, simple_name_from_path(owner))
                    .with_plain(")")
            }
            NodeKind::ActorBoundEvent => {
                let delegate = or_captured(
                    view,
                    "DelegatePropertyName",
                    captured.map(|c| c.delegate_name.as_str()),
                    "?Delegate?",
                );
                let owner = or_captured(
                    view,
                    "DelegateOwnerClass",
                    captured.map(|c| c.owner_class.as_str()),
                    "?Owner?",
                );
                StyledText::styled(SpanKind::DelegateName, delegate)
                    .with_plain(" (on Actor of type ")
                    .with(SpanKind::ClassName, simple_name_from_path(owner))
                    .with_plain(")")
            }
            NodeKind::CustomEvent => {
                let name = property(view, "CustomFunctionName").unwrap_or(view.name());
                StyledText::styled(SpanKind::EventName, name)
            }
            NodeKind::Event => {
                let raw = property(view, "EventName").unwrap_or(view.name());
                StyledText::styled(SpanKind::EventName, event_display_name(raw))
            }
            _ => StyledText::styled(SpanKind::EventName, view.name()),
        }
    }

    fn describe_event(
        &mut self,
        view: &NodeView<'p>,
        captured: Option<&CapturedEventData>,
    ) -> StyledText {
        let title = self.event_title(view, captured);
        let (prefix, with_args) = match view.kind() {
            NodeKind::ComponentBoundEvent => ("Bound Event", false),
            NodeKind::ActorBoundEvent => ("Actor Bound Event", false),
            NodeKind::InputAction | NodeKind::EnhancedInputAction => ("Input Action", true),
            NodeKind::InputAxisEvent => ("Input Axis", true),
            NodeKind::InputKey => ("Input Key", true),
            _ => ("Event", true),
        };
        let mut text = keyword(prefix).with_plain(" ").with_text(title);
        if with_args {
            if let Some(args) = signature_list(view) {
                text.push_plain(" Args: ");
                text.append(args);
            }
        }
        text
    }

    /// Entry tunnels list their bound inputs; exit tunnels their outputs.
    fn describe_tunnel(&mut self, graph: &'p Graph, view: &NodeView<'p>) -> StyledText {
        let entry = view.exec_inputs().next().is_none();
        let pins: Vec<&'p Pin> = if entry {
            view.data_outputs().filter(|p| !p.hidden).collect()
        } else {
            view.pins()
                .filter(|p| p.is_input() && !p.is_exec() && !p.hidden)
                .collect()
        };
        let label = if entry { "Inputs" } else { "Outputs" };
        if pins.is_empty() {
            return if entry { keyword(label) } else { StyledText::new() };
        }
        let values: Vec<StyledText> = pins
            .into_iter()
            .map(|pin| argument(pin.display_name(), self.resolve_value(graph, pin).into_styled()))
            .collect();
        keyword(label)
            .with_plain(": ")
            .with_text(StyledText::parenthesized(StyledText::join(values, ", ")))
    }

    fn describe_variable_set(&mut self, graph: &'p Graph, view: &NodeView<'p>) -> StyledText {
        let var = property(view, "VariableName").unwrap_or(view.name());
        let mut text = keyword("Set").with_plain(" ");
        if let Some(target) = target_pin(view).filter(|p| p.is_linked()) {
            let receiver = self.resolve_value(graph, target);
            if let Some(prefix) = explicit_receiver(&receiver) {
                text.append(prefix);
                text.push_plain(".");
            }
        }
        text.push(SpanKind::Variable, var);
        let value = self.value_of(graph, view, &[var]);
        text.with_plain(" = ").with_text(value)
    }

    fn describe_call(&mut self, graph: &'p Graph, view: &NodeView<'p>) -> StyledText {
        let receiver = self.describe_receiver(graph, view);
        let mut text = StyledText::new();
        if let Some(prefix) = explicit_receiver(&receiver) {
            text.append(prefix);
            text.push_plain(".");
        }
        let name = self.call_name(view);
        let args = self.describe_arguments(graph, view, &[]);
        text.append(call_with(name, args));
        if view.flag("IsLatent") {
            text.push(SpanKind::Modifier, LATENT);
        }
        text
    }

    fn describe_interface_call(&mut self, graph: &'p Graph, view: &NodeView<'p>) -> StyledText {
        let receiver = self.describe_receiver(graph, view);
        let name = self.call_name(view);
        let args = self.describe_arguments(graph, view, &[]);
        keyword("Call Interface")
            .with_plain(" ")
            .with_text(call_with(name, args))
            .with_text(on_receiver(&receiver))
    }

    fn describe_macro(&mut self, graph: &'p Graph, view: &NodeView<'p>) -> StyledText {
        let Some(reference) = identify(view) else {
            return self.fallback(view);
        };
        if !reference.native {
            let name = self.reference_name(&reference, SpanKind::MacroName);
            let args = self.describe_arguments(graph, view, &[]);
            return call_with(name, args);
        }

        let name = reference.item_name();
        if let Some(label) = for_each_label(name) {
            let array = self.value_of(graph, view, &["Array"]);
            let element = view
                .output("Array Element")
                .map(|p| p.ty.signature())
                .unwrap_or_else(|| "?".to_string());
            return keyword(label)
                .with_plain(" ")
                .with(SpanKind::Keyword, "in")
                .with_plain(" ")
                .with_text(StyledText::parenthesized(array))
                .with_plain(" [")
                .with(SpanKind::ParamName, "Element")
                .with_plain(": ")
                .with(SpanKind::DataType, element)
                .with_plain(", ")
                .with(SpanKind::ParamName, "Index")
                .with_plain(": ")
                .with(SpanKind::DataType, "int")
                .with_plain("]");
        }
        match name {
            "ForLoop" | "ForLoopWithBreak" => {
                let first = self.value_of(graph, view, &["FirstIndex"]);
                let last = self.value_of(graph, view, &["LastIndex"]);
                let label = if name == "ForLoop" { "For Loop" } else { "For Loop with Break" };
                keyword(label)
                    .with_plain(" (")
                    .with_text(first)
                    .with_plain(" ")
                    .with(SpanKind::Keyword, "to")
                    .with_plain(" ")
                    .with_text(last)
                    .with_plain(")")
            }
            "WhileLoop" => {
                let condition = self.value_of(graph, view, &["Condition"]);
                keyword("While Loop")
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(argument("Condition", condition)))
            }
            "Gate" => keyword("Gate"),
            "DoOnce" => keyword("Do Once"),
            "FlipFlop" => keyword("FlipFlop"),
            "DoN" => {
                let n = self.value_of(graph, view, &["N"]);
                keyword("Do N")
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(argument("N", n)))
            }
            "IsValid" => {
                let object = self.value_of(graph, view, &["InputObject", "Input Object"]);
                keyword("Is Valid")
                    .with_plain(" ")
                    .with_text(StyledText::parenthesized(object))
            }
            _ => {
                let args = self.describe_arguments(graph, view, &[]);
                call_with(StyledText::styled(SpanKind::MacroName, name), args)
            }
        }
    }

    /// `Kind (Name)` for kinds with no dedicated form.
    fn fallback(&self, view: &NodeView<'p>) -> StyledText {
        StyledText::styled(SpanKind::Keyword, view.kind().as_str())
            .with_plain(" (")
            .with(SpanKind::Info, view.name())
            .with_plain(")")
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Resolved value of the first input found among `names`.
    fn value_of(&mut self, graph: &'p Graph, view: &NodeView<'p>, names: &[&str]) -> StyledText {
        match names.iter().find_map(|name| view.input(name)) {
            Some(pin) => self.resolve_value(graph, pin).into_styled(),
            None => SymbolicValue::error(crate::error::ErrorReason::MissingPin {
                role: names.first().copied().unwrap_or("input").to_string(),
            })
            .into_styled(),
        }
    }

    fn class_of(&mut self, view: &NodeView<'p>) -> StyledText {
        let mut visiting = Visiting::new();
        self.class_text(view, 0, &mut visiting)
            .unwrap_or_else(|reason| SymbolicValue::error(reason).into_styled())
    }

    fn delegate_name(&self, view: &NodeView<'p>) -> &'p str {
        property(view, "DelegatePropertyName").unwrap_or(view.name())
    }

    /// The event bound by a delegate node: the linked event's title, else the
    /// resolved delegate input.
    fn delegate_source(&mut self, graph: &'p Graph, view: &NodeView<'p>) -> StyledText {
        let Some(pin) = view.input("Delegate") else {
            return StyledText::styled(SpanKind::Info, "?");
        };
        if let Some(event) = graph
            .source_of(pin)
            .and_then(|source| graph.owner_of(source))
            .filter(|owner| owner.kind().is_event())
        {
            return self.event_title(&event, None);
        }
        self.resolve_value(graph, pin).into_styled()
    }
}
