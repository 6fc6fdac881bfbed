//! Literal formatting: a pin's stored default content as display text.
//!
//! [`format_default`] dispatches on the pin's declared type. Struct defaults
//! go through [`parse_struct_default`], which knows the layout of the common
//! math structs and of gameplay tags. [`is_trivial_default`] decides whether
//! a default is the zero value of its type, so argument lists can elide it.

use bpflow_core::types::simple_name_from_path;
use bpflow_core::{ContainerKind, Pin, PinCategory, PinType};

use crate::span::{SpanKind, StyledText};
use crate::value::SymbolicValue;

/// Pin names that stand for the implicit call context when unlinked.
const SELF_LIKE_PINS: [&str; 3] = ["self", "Target", "WorldContextObject"];

/// Shown for pins with no stored content and no zero value to fall back on.
pub const NO_DEFAULT: &str = "(No Default)";

// ---------------------------------------------------------------------------
// Small text helpers
// ---------------------------------------------------------------------------

/// Rounds numeric text to three decimals and trims trailing zeros.
///
/// Text that is not a number is returned trimmed but otherwise unchanged.
pub fn truncate_float(text: &str) -> String {
    let trimmed = text.trim();
    let Ok(value) = trimmed.parse::<f64>() else {
        return trimmed.to_string();
    };
    if !value.is_finite() {
        return trimmed.to_string();
    }
    let mut out = format!("{value:.3}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

/// Removes one pair of surrounding double or single quotes.
pub fn strip_quotes(text: &str) -> &str {
    let t = text.trim();
    for quote in ['"', '\''] {
        if t.len() >= 2 && t.starts_with(quote) && t.ends_with(quote) {
            return &t[1..t.len() - 1];
        }
    }
    t
}

/// Splits on a separator that is not nested inside parentheses, brackets,
/// braces or quotes.
pub fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '(' | '[' | '{' if !in_quotes => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' if !in_quotes => {
                depth -= 1;
                current.push(c);
            }
            c if c == separator && depth == 0 && !in_quotes => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn is_zero_like(value: &str) -> bool {
    let v = strip_quotes(value).trim();
    if v.is_empty() || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("none") {
        return true;
    }
    v.parse::<f64>().is_ok_and(|n| n.abs() < 1e-8)
}

fn is_none_text(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("none") || v.eq_ignore_ascii_case("null")
}

/// The last quoted string of a localized-text macro such as
/// `NSLOCTEXT("Ns", "Key", "Hello")`, or the input without quotes.
pub fn localized_text(raw: &str) -> String {
    let t = raw.trim();
    let is_macro = ["NSLOCTEXT(", "LOCTEXT(", "INVTEXT(", "LOCGEN_"]
        .iter()
        .any(|prefix| t.starts_with(prefix));
    if is_macro {
        let quoted: Vec<&str> = t.split('"').collect();
        // Quoted segments sit at odd indices.
        if let Some(last) = quoted.iter().skip(1).step_by(2).last() {
            return last.to_string();
        }
    }
    strip_quotes(t).to_string()
}

// ---------------------------------------------------------------------------
// Struct defaults
// ---------------------------------------------------------------------------

/// Parsed form of a struct default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructLiteral {
    /// `()` or nothing at all.
    Empty,
    /// A gameplay tag collapsed to its tag name (empty when unset).
    Tag(String),
    /// A gameplay tag container's tags.
    TagContainer(Vec<String>),
    /// Labelled components in display order.
    Fields(Vec<(String, String)>),
    /// Content that could not be decomposed.
    Unparsed,
}

impl StructLiteral {
    /// Zero value of its struct type. A non-empty tag is never trivial.
    pub fn is_trivial(&self) -> bool {
        match self {
            StructLiteral::Empty => true,
            StructLiteral::Tag(tag) => is_none_text(tag),
            StructLiteral::TagContainer(tags) => tags.is_empty(),
            StructLiteral::Fields(fields) => fields.iter().all(|(_, v)| is_zero_like(v)),
            StructLiteral::Unparsed => false,
        }
    }
}

fn component_labels(type_name: &str) -> Option<&'static [&'static str]> {
    match type_name {
        "Vector" | "Vector3f" | "Vector3d" => Some(&["X", "Y", "Z"]),
        "Vector2D" | "Vector2f" | "IntPoint" => Some(&["X", "Y"]),
        "Vector4" | "Quat" => Some(&["X", "Y", "Z", "W"]),
        "Rotator" => Some(&["P", "Y", "R"]),
        "LinearColor" | "Color" => Some(&["R", "G", "B", "A"]),
        _ => None,
    }
}

fn rotator_key(key: &str) -> String {
    match key {
        "Pitch" => "P".to_string(),
        "Yaw" => "Y".to_string(),
        "Roll" => "R".to_string(),
        other => other.to_string(),
    }
}

fn labelled_components(content: &str, labels: &[&str], rotator: bool) -> Vec<(String, String)> {
    split_top_level(content, ',')
        .into_iter()
        .zip(labels.iter())
        .map(|(part, label)| match part.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                let key = if rotator { rotator_key(key) } else { key.to_string() };
                (key, truncate_float(strip_quotes(value)))
            }
            None => (label.to_string(), truncate_float(strip_quotes(&part))),
        })
        .collect()
}

fn transform_components(content: &str) -> Vec<(String, String)> {
    const GROUPS: [&str; 3] = ["Location", "Rotation", "Scale"];
    const AXES: [&str; 3] = ["X", "Y", "Z"];
    let mut out = Vec::new();
    if content.contains('|') {
        for (group, chunk) in GROUPS.iter().zip(content.split('|')) {
            for (axis, value) in AXES.iter().zip(chunk.split(',')) {
                out.push((format!("{group}.{axis}"), truncate_float(value)));
            }
        }
        return out;
    }
    let labels: Vec<String> = GROUPS
        .iter()
        .flat_map(|g| AXES.iter().map(move |a| format!("{g}.{a}")))
        .collect();
    for (part, label) in split_top_level(content, ',').into_iter().zip(labels) {
        match part.split_once('=') {
            Some((key, value)) => out.push((key.trim().to_string(), truncate_float(strip_quotes(value)))),
            None => out.push((label, truncate_float(&part))),
        }
    }
    out
}

/// Every `TagName=` value in the content, in order.
fn tag_names(content: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut rest = content;
    while let Some(pos) = rest.find("TagName") {
        rest = &rest[pos + "TagName".len()..];
        let Some(after_eq) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let value: String = after_eq
            .trim_start()
            .trim_start_matches('"')
            .chars()
            .take_while(|c| !matches!(c, '"' | ')' | ','))
            .collect();
        let value = value.trim().to_string();
        if !is_none_text(&value) {
            tags.push(value);
        }
        rest = after_eq;
    }
    tags
}

fn strip_parens(text: &str) -> &str {
    let t = text.trim();
    if t.len() >= 2 && t.starts_with('(') && t.ends_with(')') {
        t[1..t.len() - 1].trim()
    } else {
        t
    }
}

/// Decomposes a struct default for the given simple struct type name.
pub fn parse_struct_default(raw: &str, type_name: &str) -> StructLiteral {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "()" || trimmed == "{}" {
        return if type_name == "GameplayTagContainer" {
            StructLiteral::TagContainer(Vec::new())
        } else {
            StructLiteral::Empty
        };
    }
    let content = strip_parens(trimmed);

    match type_name {
        "GameplayTag" => {
            let tag = tag_names(content).into_iter().next().unwrap_or_else(|| {
                if content.contains('=') {
                    String::new()
                } else {
                    strip_quotes(content).to_string()
                }
            });
            return StructLiteral::Tag(tag);
        }
        "GameplayTagContainer" => {
            let mut tags = tag_names(content);
            if tags.is_empty() && !content.contains('=') {
                tags = split_top_level(strip_parens(content), ',')
                    .iter()
                    .map(|t| strip_quotes(t).to_string())
                    .filter(|t| !is_none_text(t))
                    .collect();
            }
            return StructLiteral::TagContainer(tags);
        }
        "Transform" => {
            let fields = transform_components(content);
            return if fields.is_empty() {
                StructLiteral::Unparsed
            } else {
                StructLiteral::Fields(fields)
            };
        }
        _ => {}
    }

    if let Some(labels) = component_labels(type_name) {
        let fields = labelled_components(content, labels, type_name == "Rotator");
        if !fields.is_empty() {
            return StructLiteral::Fields(fields);
        }
    }

    if content.is_empty() {
        return StructLiteral::Empty;
    }
    let tags = tag_names(content);
    if let Some(tag) = tags.into_iter().next() {
        return StructLiteral::Tag(tag);
    }
    let mut fields = Vec::new();
    for part in split_top_level(content, ',') {
        match part.split_once('=') {
            Some((key, value)) => {
                fields.push((key.trim().to_string(), truncate_float(strip_quotes(value))));
            }
            None => return StructLiteral::Unparsed,
        }
    }
    if fields.is_empty() {
        StructLiteral::Unparsed
    } else {
        StructLiteral::Fields(fields)
    }
}

/// Raw struct content: the stored text, or the field map re-joined.
fn struct_content(pin: &Pin) -> String {
    if let Some(value) = pin.default.value.as_deref().filter(|v| !v.trim().is_empty()) {
        return value.trim().to_string();
    }
    if pin.default.fields.is_empty() {
        return String::new();
    }
    let joined: Vec<String> = pin
        .default
        .fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("({})", joined.join(","))
}

fn struct_styled(parsed: &StructLiteral, type_name: &str) -> StyledText {
    match parsed {
        StructLiteral::Empty => StyledText::styled(SpanKind::LiteralStructType, type_name)
            .with(SpanKind::LiteralStructValue, "()"),
        StructLiteral::Tag(tag) if is_none_text(tag) => StyledText::styled(SpanKind::LiteralTag, "None"),
        StructLiteral::Tag(tag) => StyledText::styled(SpanKind::LiteralTag, tag.clone()),
        StructLiteral::TagContainer(tags) => {
            StyledText::styled(SpanKind::LiteralContainer, format!("({{{}}})", tags.join(", ")))
        }
        StructLiteral::Fields(fields) => {
            let body: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
            StyledText::styled(SpanKind::LiteralStructValue, format!("({})", body.join(", ")))
        }
        StructLiteral::Unparsed => StyledText::styled(SpanKind::LiteralStructType, type_name)
            .with(SpanKind::LiteralUnknown, "(...)"),
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Enum literal text `EnumType::Value`.
pub fn enum_literal(enum_type: &str, value: &str) -> StyledText {
    let value = value.trim();
    let value = value
        .strip_prefix(enum_type)
        .and_then(|v| v.strip_prefix("::"))
        .unwrap_or(value);
    let value = value.rsplit("::").next().unwrap_or(value);
    let value = if is_none_text(value) { "[Default Value]" } else { value };
    StyledText::styled(SpanKind::EnumType, enum_type)
        .with_plain("::")
        .with(SpanKind::EnumValue, value)
}

fn stored_value(pin: &Pin) -> Option<&str> {
    pin.default
        .value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn stored_object(pin: &Pin) -> Option<&str> {
    pin.default
        .object
        .as_deref()
        .map(str::trim)
        .filter(|v| !is_none_text(v))
}

fn empty_container(ty: &PinType) -> &'static str {
    match ty.container {
        ContainerKind::Array => "[]",
        _ => "{}",
    }
}

/// Formats a pin's stored default content for its declared type.
pub fn format_default(pin: &Pin) -> SymbolicValue {
    let ty = &pin.ty;
    let lit = |text: StyledText| SymbolicValue::literal(text, ty);

    if ty.is_container() {
        let raw = stored_value(pin).unwrap_or("");
        let text = if matches!(raw, "" | "()" | "[]" | "{}") {
            empty_container(ty).to_string()
        } else {
            raw.to_string()
        };
        return lit(StyledText::styled(SpanKind::LiteralContainer, text));
    }

    let has_text = pin
        .default
        .text
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());
    let has_content = stored_value(pin).is_some()
        || stored_object(pin).is_some()
        || has_text
        || !pin.default.fields.is_empty();

    if !has_content {
        if pin.is_input() && SELF_LIKE_PINS.contains(&pin.name.as_str()) {
            return SymbolicValue::named(SpanKind::Variable, "self");
        }
        if let Some(enum_type) = ty.enum_name() {
            return lit(enum_literal(&enum_type, ""));
        }
        return match ty.category {
            PinCategory::Name => lit(StyledText::styled(SpanKind::LiteralName, "None")),
            _ if ty.is_object_like() => lit(StyledText::styled(SpanKind::LiteralObject, "None")),
            _ => lit(StyledText::styled(SpanKind::Info, NO_DEFAULT)),
        };
    }

    if let Some(enum_type) = ty.enum_name() {
        let value = pin
            .default
            .label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| stored_value(pin))
            .unwrap_or("");
        return lit(enum_literal(&enum_type, strip_quotes(value)));
    }

    let value = stored_value(pin).unwrap_or("");
    let text = match &ty.category {
        PinCategory::Bool => StyledText::styled(SpanKind::LiteralBool, value.to_ascii_lowercase()),
        PinCategory::Byte | PinCategory::Int | PinCategory::Int64 => {
            let shown = match value.parse::<i64>() {
                Ok(n) => n.to_string(),
                Err(_) => truncate_float(value),
            };
            StyledText::styled(SpanKind::LiteralNumber, shown)
        }
        PinCategory::Real | PinCategory::Float | PinCategory::Double => {
            StyledText::styled(SpanKind::LiteralNumber, truncate_float(value))
        }
        PinCategory::String => StyledText::styled(SpanKind::LiteralString, strip_quotes(value)),
        PinCategory::Text => {
            let raw = pin
                .default
                .text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(value);
            StyledText::styled(SpanKind::LiteralText, localized_text(raw))
        }
        PinCategory::Name => {
            let name = strip_quotes(value);
            let name = if is_none_text(name) { "None" } else { name };
            StyledText::styled(SpanKind::LiteralName, name)
        }
        PinCategory::Struct => {
            let type_name = ty.struct_name().unwrap_or_else(|| "Struct".to_string());
            let parsed = parse_struct_default(&struct_content(pin), &type_name);
            struct_styled(&parsed, &type_name)
        }
        _ if ty.is_object_like() => {
            let path = stored_object(pin).unwrap_or(value);
            let name = simple_name_from_path(strip_quotes(path));
            if is_none_text(&name) {
                StyledText::styled(SpanKind::LiteralObject, "None")
            } else {
                let mut text = StyledText::styled(SpanKind::LiteralObject, name);
                let suffix = ty.reference_suffix();
                if !suffix.is_empty() {
                    text.push(SpanKind::Modifier, suffix);
                }
                text
            }
        }
        _ => StyledText::styled(SpanKind::LiteralUnknown, strip_quotes(value)),
    };
    lit(text)
}

/// True when the pin is unlinked and its default is the zero value of its
/// declared type.
pub fn is_trivial_default(pin: &Pin) -> bool {
    if pin.is_linked() {
        return false;
    }
    let ty = &pin.ty;
    let value = stored_value(pin).unwrap_or("");
    let object = stored_object(pin);
    let text = pin.default.text.as_deref().map(str::trim).unwrap_or("");
    if value.is_empty() && object.is_none() && text.is_empty() && pin.default.fields.is_empty() {
        return true;
    }

    if ty.is_container() {
        return matches!(value, "" | "()" | "[]" | "{}");
    }

    let structured = ty.category == PinCategory::Struct || ty.is_object_like();
    if !structured && !value.is_empty() {
        if let Some(auto) = pin.default.autogenerated.as_deref() {
            if strip_quotes(value).eq_ignore_ascii_case(strip_quotes(auto)) {
                return true;
            }
        }
    }

    if ty.enum_name().is_some() {
        return is_none_text(value);
    }

    match &ty.category {
        PinCategory::Bool => value.eq_ignore_ascii_case("false"),
        PinCategory::Byte
        | PinCategory::Int
        | PinCategory::Int64
        | PinCategory::Real
        | PinCategory::Float
        | PinCategory::Double => value.parse::<f64>().is_ok_and(|n| n.abs() < 1e-8),
        PinCategory::String => strip_quotes(value).is_empty(),
        PinCategory::Text => {
            let raw = if text.is_empty() { value } else { text };
            localized_text(raw).is_empty()
        }
        PinCategory::Name => is_none_text(strip_quotes(value)),
        PinCategory::Struct => {
            let type_name = ty.struct_name().unwrap_or_default();
            parse_struct_default(&struct_content(pin), &type_name).is_trivial()
        }
        _ if ty.is_object_like() => object.is_none() && is_none_text(strip_quotes(value)),
        _ => false,
    }
}
