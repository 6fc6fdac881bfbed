//! Nodes and the closed set of node kinds.
//!
//! [`NodeKind`] is parsed from the editor's class tag (`K2Node_CallFunction`
//! or the bare `CallFunction`). Every component of the trace engine matches on
//! it exhaustively, so adding a kind means adding one variant here and one arm
//! per dispatch table.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::{NodeId, PinId};

/// Kind tag of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    // Events and graph boundaries
    Event,
    CustomEvent,
    ComponentBoundEvent,
    ActorBoundEvent,
    InputAction,
    InputAxisEvent,
    InputKey,
    EnhancedInputAction,
    FunctionEntry,
    FunctionResult,
    Tunnel,

    // Pass-through and annotation
    Knot,
    Comment,

    // Variables and literals
    VariableGet,
    VariableSet,
    Self_,
    Literal,

    // Calls
    CallFunction,
    CallParentFunction,
    CallArrayFunction,
    Message,
    CommutativeAssociativeBinaryOperator,
    PromotableOperator,
    MacroInstance,
    Composite,

    // Control flow
    IfThenElse,
    SwitchEnum,
    SwitchInteger,
    SwitchString,
    SwitchName,
    ExecutionSequence,
    MultiGate,
    DynamicCast,

    // Delegates
    AddDelegate,
    RemoveDelegate,
    ClearDelegate,
    AssignDelegate,
    CallDelegate,
    CreateDelegate,

    // Structs and containers
    Timeline,
    SetFieldsInStruct,
    BreakStruct,
    MakeStruct,
    MakeArray,
    GetArrayItem,
    MakeMap,
    MakeSet,
    Select,

    // Object creation
    SpawnActorFromClass,
    AddComponent,
    CreateWidget,
    GenericCreateObject,

    // Text, latent actions, lookups
    FormatText,
    PlayMontage,
    Delay,
    AIMoveTo,
    MoveComponentTo,
    EnumEquality,
    EnumInequality,
    CastByteToEnum,
    EnumLiteral,
    GetClassDefaults,
    GetSubsystem,
    GetDataTableRow,

    /// Any tag outside the known set, kept verbatim.
    Other(String),
}

impl NodeKind {
    /// Parses a kind tag, accepting an optional `K2Node_` / `EdGraphNode_` prefix.
    pub fn from_tag(tag: &str) -> Self {
        let bare = tag.trim();
        let bare = bare.strip_prefix("K2Node_").unwrap_or(bare);
        let bare = bare.strip_prefix("EdGraphNode_").unwrap_or(bare);
        match bare {
            "Event" => NodeKind::Event,
            "CustomEvent" => NodeKind::CustomEvent,
            "ComponentBoundEvent" => NodeKind::ComponentBoundEvent,
            "ActorBoundEvent" => NodeKind::ActorBoundEvent,
            "InputAction" => NodeKind::InputAction,
            "InputAxisEvent" => NodeKind::InputAxisEvent,
            "InputKey" => NodeKind::InputKey,
            "EnhancedInputAction" => NodeKind::EnhancedInputAction,
            "FunctionEntry" => NodeKind::FunctionEntry,
            "FunctionResult" => NodeKind::FunctionResult,
            "Tunnel" => NodeKind::Tunnel,
            "Knot" | "Reroute" => NodeKind::Knot,
            "Comment" => NodeKind::Comment,
            "VariableGet" => NodeKind::VariableGet,
            "VariableSet" => NodeKind::VariableSet,
            "Self" => NodeKind::Self_,
            "Literal" => NodeKind::Literal,
            "CallFunction" => NodeKind::CallFunction,
            "CallParentFunction" => NodeKind::CallParentFunction,
            "CallArrayFunction" => NodeKind::CallArrayFunction,
            "Message" => NodeKind::Message,
            "CommutativeAssociativeBinaryOperator" => {
                NodeKind::CommutativeAssociativeBinaryOperator
            }
            "PromotableOperator" => NodeKind::PromotableOperator,
            "MacroInstance" => NodeKind::MacroInstance,
            "Composite" => NodeKind::Composite,
            "IfThenElse" => NodeKind::IfThenElse,
            "SwitchEnum" => NodeKind::SwitchEnum,
            "SwitchInteger" => NodeKind::SwitchInteger,
            "SwitchString" => NodeKind::SwitchString,
            "SwitchName" => NodeKind::SwitchName,
            "ExecutionSequence" => NodeKind::ExecutionSequence,
            "MultiGate" => NodeKind::MultiGate,
            "DynamicCast" | "ClassDynamicCast" => NodeKind::DynamicCast,
            "AddDelegate" => NodeKind::AddDelegate,
            "RemoveDelegate" => NodeKind::RemoveDelegate,
            "ClearDelegate" => NodeKind::ClearDelegate,
            "AssignDelegate" => NodeKind::AssignDelegate,
            "CallDelegate" => NodeKind::CallDelegate,
            "CreateDelegate" => NodeKind::CreateDelegate,
            "Timeline" => NodeKind::Timeline,
            "SetFieldsInStruct" => NodeKind::SetFieldsInStruct,
            "BreakStruct" => NodeKind::BreakStruct,
            "MakeStruct" => NodeKind::MakeStruct,
            "MakeArray" => NodeKind::MakeArray,
            "GetArrayItem" => NodeKind::GetArrayItem,
            "MakeMap" => NodeKind::MakeMap,
            "MakeSet" => NodeKind::MakeSet,
            "Select" => NodeKind::Select,
            "SpawnActorFromClass" => NodeKind::SpawnActorFromClass,
            "AddComponent" | "AddComponentByClass" => NodeKind::AddComponent,
            "CreateWidget" => NodeKind::CreateWidget,
            "GenericCreateObject" => NodeKind::GenericCreateObject,
            "FormatText" => NodeKind::FormatText,
            "PlayMontage" => NodeKind::PlayMontage,
            "Delay" => NodeKind::Delay,
            "AIMoveTo" => NodeKind::AIMoveTo,
            "MoveComponentTo" => NodeKind::MoveComponentTo,
            "EnumEquality" => NodeKind::EnumEquality,
            "EnumInequality" => NodeKind::EnumInequality,
            "CastByteToEnum" => NodeKind::CastByteToEnum,
            "EnumLiteral" => NodeKind::EnumLiteral,
            "GetClassDefaults" => NodeKind::GetClassDefaults,
            "GetSubsystem" | "GetSubsystemFromPC" | "GetEngineSubsystem" => NodeKind::GetSubsystem,
            "GetDataTableRow" => NodeKind::GetDataTableRow,
            _ => NodeKind::Other(bare.to_string()),
        }
    }

    /// Bare tag text, without the `K2Node_` prefix.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Event => "Event",
            NodeKind::CustomEvent => "CustomEvent",
            NodeKind::ComponentBoundEvent => "ComponentBoundEvent",
            NodeKind::ActorBoundEvent => "ActorBoundEvent",
            NodeKind::InputAction => "InputAction",
            NodeKind::InputAxisEvent => "InputAxisEvent",
            NodeKind::InputKey => "InputKey",
            NodeKind::EnhancedInputAction => "EnhancedInputAction",
            NodeKind::FunctionEntry => "FunctionEntry",
            NodeKind::FunctionResult => "FunctionResult",
            NodeKind::Tunnel => "Tunnel",
            NodeKind::Knot => "Knot",
            NodeKind::Comment => "Comment",
            NodeKind::VariableGet => "VariableGet",
            NodeKind::VariableSet => "VariableSet",
            NodeKind::Self_ => "Self",
            NodeKind::Literal => "Literal",
            NodeKind::CallFunction => "CallFunction",
            NodeKind::CallParentFunction => "CallParentFunction",
            NodeKind::CallArrayFunction => "CallArrayFunction",
            NodeKind::Message => "Message",
            NodeKind::CommutativeAssociativeBinaryOperator => {
                "CommutativeAssociativeBinaryOperator"
            }
            NodeKind::PromotableOperator => "PromotableOperator",
            NodeKind::MacroInstance => "MacroInstance",
            NodeKind::Composite => "Composite",
            NodeKind::IfThenElse => "IfThenElse",
            NodeKind::SwitchEnum => "SwitchEnum",
            NodeKind::SwitchInteger => "SwitchInteger",
            NodeKind::SwitchString => "SwitchString",
            NodeKind::SwitchName => "SwitchName",
            NodeKind::ExecutionSequence => "ExecutionSequence",
            NodeKind::MultiGate => "MultiGate",
            NodeKind::DynamicCast => "DynamicCast",
            NodeKind::AddDelegate => "AddDelegate",
            NodeKind::RemoveDelegate => "RemoveDelegate",
            NodeKind::ClearDelegate => "ClearDelegate",
            NodeKind::AssignDelegate => "AssignDelegate",
            NodeKind::CallDelegate => "CallDelegate",
            NodeKind::CreateDelegate => "CreateDelegate",
            NodeKind::Timeline => "Timeline",
            NodeKind::SetFieldsInStruct => "SetFieldsInStruct",
            NodeKind::BreakStruct => "BreakStruct",
            NodeKind::MakeStruct => "MakeStruct",
            NodeKind::MakeArray => "MakeArray",
            NodeKind::GetArrayItem => "GetArrayItem",
            NodeKind::MakeMap => "MakeMap",
            NodeKind::MakeSet => "MakeSet",
            NodeKind::Select => "Select",
            NodeKind::SpawnActorFromClass => "SpawnActorFromClass",
            NodeKind::AddComponent => "AddComponent",
            NodeKind::CreateWidget => "CreateWidget",
            NodeKind::GenericCreateObject => "GenericCreateObject",
            NodeKind::FormatText => "FormatText",
            NodeKind::PlayMontage => "PlayMontage",
            NodeKind::Delay => "Delay",
            NodeKind::AIMoveTo => "AIMoveTo",
            NodeKind::MoveComponentTo => "MoveComponentTo",
            NodeKind::EnumEquality => "EnumEquality",
            NodeKind::EnumInequality => "EnumInequality",
            NodeKind::CastByteToEnum => "CastByteToEnum",
            NodeKind::EnumLiteral => "EnumLiteral",
            NodeKind::GetClassDefaults => "GetClassDefaults",
            NodeKind::GetSubsystem => "GetSubsystem",
            NodeKind::GetDataTableRow => "GetDataTableRow",
            NodeKind::Other(tag) => tag,
        }
    }

    /// Event-like entry points of an event graph.
    pub fn is_event(&self) -> bool {
        matches!(
            self,
            NodeKind::Event
                | NodeKind::CustomEvent
                | NodeKind::ComponentBoundEvent
                | NodeKind::ActorBoundEvent
                | NodeKind::InputAction
                | NodeKind::InputAxisEvent
                | NodeKind::InputKey
                | NodeKind::EnhancedInputAction
        )
    }

    /// Reroute and annotation nodes that never form a trace step.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, NodeKind::Knot | NodeKind::Comment)
    }

    /// Nodes that bound a graph and may legitimately have no exec successor.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionEntry | NodeKind::FunctionResult | NodeKind::Tunnel
        )
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::from_tag(&tag)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node: one step of control and/or data production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Display name (node title).
    #[serde(default)]
    pub name: String,
    /// Declared properties in stored order.
    #[serde(default)]
    pub properties: IndexMap<String, String>,
    /// Owned pins in declaration order.
    #[serde(default)]
    pub pins: Vec<PinId>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, name: impl Into<String>) -> Self {
        Node {
            id,
            kind,
            name: name.into(),
            properties: IndexMap::new(),
            pins: Vec::new(),
        }
    }

    /// A property value, treating blank values as absent.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// A boolean property (`true`, case-insensitive).
    pub fn flag(&self, key: &str) -> bool {
        self.property(key)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}
