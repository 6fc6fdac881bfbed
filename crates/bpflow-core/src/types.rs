//! Declared pin types.
//!
//! Editor pins carry a category tag (`bool`, `object`, `struct`, ...), an
//! optional sub-category and sub-category object (the concrete class, struct
//! or enum path), and a container kind. [`PinType`] bundles those together
//! and answers the questions the trace engine asks about a pin's type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base kind of a pin, parsed from the editor's category tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PinCategory {
    Exec,
    Bool,
    Byte,
    Int,
    Int64,
    Real,
    Float,
    Double,
    String,
    Text,
    Name,
    Object,
    Class,
    Interface,
    Struct,
    Enum,
    SoftObject,
    SoftClass,
    WeakObject,
    Delegate,
    MulticastDelegate,
    Wildcard,
    /// Any tag outside the known set, kept verbatim.
    Other(String),
}

impl PinCategory {
    /// Parses a category tag. Case-insensitive and total.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "exec" => PinCategory::Exec,
            "bool" | "boolean" => PinCategory::Bool,
            "byte" => PinCategory::Byte,
            "int" | "integer" => PinCategory::Int,
            "int64" => PinCategory::Int64,
            "real" => PinCategory::Real,
            "float" => PinCategory::Float,
            "double" => PinCategory::Double,
            "string" | "str" => PinCategory::String,
            "text" => PinCategory::Text,
            "name" => PinCategory::Name,
            "object" => PinCategory::Object,
            "class" => PinCategory::Class,
            "interface" => PinCategory::Interface,
            "struct" => PinCategory::Struct,
            "enum" => PinCategory::Enum,
            "softobject" => PinCategory::SoftObject,
            "softclass" => PinCategory::SoftClass,
            "weakobject" => PinCategory::WeakObject,
            "delegate" => PinCategory::Delegate,
            "mcdelegate" | "multicastdelegate" => PinCategory::MulticastDelegate,
            "wildcard" => PinCategory::Wildcard,
            _ => PinCategory::Other(tag.trim().to_string()),
        }
    }

    /// The canonical tag text.
    pub fn as_str(&self) -> &str {
        match self {
            PinCategory::Exec => "exec",
            PinCategory::Bool => "bool",
            PinCategory::Byte => "byte",
            PinCategory::Int => "int",
            PinCategory::Int64 => "int64",
            PinCategory::Real => "real",
            PinCategory::Float => "float",
            PinCategory::Double => "double",
            PinCategory::String => "string",
            PinCategory::Text => "text",
            PinCategory::Name => "name",
            PinCategory::Object => "object",
            PinCategory::Class => "class",
            PinCategory::Interface => "interface",
            PinCategory::Struct => "struct",
            PinCategory::Enum => "enum",
            PinCategory::SoftObject => "softobject",
            PinCategory::SoftClass => "softclass",
            PinCategory::WeakObject => "weakobject",
            PinCategory::Delegate => "delegate",
            PinCategory::MulticastDelegate => "mcdelegate",
            PinCategory::Wildcard => "wildcard",
            PinCategory::Other(tag) => tag,
        }
    }
}

impl From<String> for PinCategory {
    fn from(tag: String) -> Self {
        PinCategory::from_tag(&tag)
    }
}

impl From<PinCategory> for String {
    fn from(category: PinCategory) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for PinCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container wrapping of a pin's base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    #[default]
    None,
    Array,
    Set,
    Map,
}

/// The declared type of a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinType {
    pub category: PinCategory,
    #[serde(default)]
    pub sub_category: String,
    /// Path of the concrete class, struct or enum, e.g. `/Script/CoreUObject.Vector`.
    #[serde(default)]
    pub sub_category_object: String,
    #[serde(default)]
    pub container: ContainerKind,
    /// Value type of a map container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_value: Option<Box<PinType>>,
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default)]
    pub is_const: bool,
}

impl PinType {
    /// A plain, non-container type of the given category.
    pub fn new(category: PinCategory) -> Self {
        PinType {
            category,
            sub_category: String::new(),
            sub_category_object: String::new(),
            container: ContainerKind::None,
            map_value: None,
            is_reference: false,
            is_const: false,
        }
    }

    pub fn exec() -> Self {
        PinType::new(PinCategory::Exec)
    }

    /// A type with a concrete sub-object (struct, enum or class path).
    pub fn with_object(category: PinCategory, object: &str) -> Self {
        PinType {
            sub_category_object: object.to_string(),
            ..PinType::new(category)
        }
    }

    pub fn array_of(mut self) -> Self {
        self.container = ContainerKind::Array;
        self
    }

    pub fn set_of(mut self) -> Self {
        self.container = ContainerKind::Set;
        self
    }

    pub fn map_to(mut self, value: PinType) -> Self {
        self.container = ContainerKind::Map;
        self.map_value = Some(Box::new(value));
        self
    }

    pub fn is_exec(&self) -> bool {
        self.category == PinCategory::Exec
    }

    pub fn is_container(&self) -> bool {
        self.container != ContainerKind::None
    }

    /// Numeric scalar kinds. A byte pin backed by an enum is not numeric.
    pub fn is_numeric(&self) -> bool {
        match self.category {
            PinCategory::Byte => self.enum_name().is_none(),
            PinCategory::Int
            | PinCategory::Int64
            | PinCategory::Real
            | PinCategory::Float
            | PinCategory::Double => true,
            _ => false,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self.category,
            PinCategory::Real | PinCategory::Float | PinCategory::Double
        )
    }

    /// Object, class, interface and asset references, including soft and weak variants.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self.category,
            PinCategory::Object
                | PinCategory::Class
                | PinCategory::Interface
                | PinCategory::SoftObject
                | PinCategory::SoftClass
                | PinCategory::WeakObject
        )
    }

    pub fn is_string_like(&self) -> bool {
        matches!(self.category, PinCategory::String | PinCategory::Text)
    }

    /// Simple enum type name when the pin's sub-type is an enumeration.
    pub fn enum_name(&self) -> Option<String> {
        let candidate = match self.category {
            PinCategory::Enum | PinCategory::Byte => &self.sub_category_object,
            _ => return None,
        };
        if candidate.is_empty() {
            return None;
        }
        Some(simple_name_from_path(candidate))
    }

    /// Simple struct type name for struct pins.
    pub fn struct_name(&self) -> Option<String> {
        if self.category != PinCategory::Struct {
            return None;
        }
        if self.sub_category_object.is_empty() {
            Some("Struct".to_string())
        } else {
            Some(simple_name_from_path(&self.sub_category_object))
        }
    }

    /// Suffix marking the reference flavour of object-like categories.
    pub fn reference_suffix(&self) -> &'static str {
        match self.category {
            PinCategory::SoftObject => " (soft)",
            PinCategory::SoftClass => " (soft class)",
            PinCategory::WeakObject => " (weak)",
            PinCategory::Class => " (class)",
            PinCategory::Interface => " (interface)",
            _ => "",
        }
    }

    /// Human-readable signature, e.g. `Array<int>` or `Map<name, Vector>`.
    pub fn signature(&self) -> String {
        let base = self.base_signature();
        match self.container {
            ContainerKind::None => base,
            ContainerKind::Array => format!("Array<{base}>"),
            ContainerKind::Set => format!("Set<{base}>"),
            ContainerKind::Map => {
                let value = self
                    .map_value
                    .as_ref()
                    .map(|v| v.base_signature())
                    .unwrap_or_else(|| "?".to_string());
                format!("Map<{base}, {value}>")
            }
        }
    }

    fn base_signature(&self) -> String {
        if let Some(name) = self.enum_name() {
            return name;
        }
        match self.category {
            PinCategory::Struct => self.struct_name().unwrap_or_else(|| "Struct".into()),
            PinCategory::Real if !self.sub_category.is_empty() => self.sub_category.clone(),
            _ if self.is_object_like() => {
                if self.sub_category_object.is_empty() {
                    self.category.as_str().to_string()
                } else {
                    simple_name_from_path(&self.sub_category_object)
                }
            }
            _ => self.category.as_str().to_string(),
        }
    }
}

/// Extracts the last meaningful segment of an asset or class path.
///
/// Handles `Class'/Script/Engine.Actor'` wrappers, `/Game/BP_Foo.BP_Foo_C`
/// generated-class paths and `Default__` prefixes.
pub fn simple_name_from_path(path: &str) -> String {
    let mut s = path.trim();
    if let (Some(open), true) = (s.find('\''), s.ends_with('\'')) {
        if open + 1 < s.len() - 1 {
            s = &s[open + 1..s.len() - 1];
        }
    }
    let s = s.trim_matches('"');
    let tail = s
        .rsplit(|c| c == '.' || c == ':' || c == '/')
        .find(|seg| !seg.is_empty())
        .unwrap_or(s);
    let tail = tail.strip_prefix("Default__").unwrap_or(tail);
    let tail = tail.strip_suffix("_C").unwrap_or(tail);
    tail.to_string()
}
