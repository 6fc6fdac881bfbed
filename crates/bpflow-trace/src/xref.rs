//! Cross-reference naming for calls into separately defined sub-graphs.
//!
//! [`identify`] decides whether a node calls a unit that gets its own
//! definition section (a function, macro, collapsed graph, custom event or
//! interface member). [`canonical_anchor`] turns the unit's location into one
//! anchor shared by every call site, and [`display_name`] picks the label
//! shown at a call site.

use std::fmt;

use bpflow_core::types::simple_name_from_path;
use bpflow_core::{NodeKind, NodeView};
use bpflow_store::normalize_location;

use crate::names::{asset_of_path, item_of_location, owner_name};

/// Kind of a separately defined sub-graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubgraphKind {
    Function,
    Macro,
    CollapsedGraph,
    CustomEventGraph,
    Interface,
}

impl SubgraphKind {
    /// Label used in definition headings.
    pub fn label(self) -> &'static str {
        match self {
            SubgraphKind::Function => "Function",
            SubgraphKind::Macro => "Macro",
            SubgraphKind::CollapsedGraph => "Collapsed Graph",
            SubgraphKind::CustomEventGraph => "Custom Event",
            SubgraphKind::Interface => "Interface",
        }
    }
}

impl fmt::Display for SubgraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A call target that may be rendered as its own definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgraphReference {
    pub kind: SubgraphKind,
    /// Location key of the defining graph.
    pub location: String,
    /// Owner-qualified name, e.g. `MyAsset.Foo`.
    pub hint: String,
    /// Canonical anchor shared by all call sites.
    pub anchor: String,
    /// Defined by engine code or the engine's macro library; never linked.
    pub native: bool,
}

impl SubgraphReference {
    pub fn new(kind: SubgraphKind, location: &str, hint: &str, native: bool) -> Self {
        SubgraphReference {
            kind,
            location: location.to_string(),
            hint: hint.to_string(),
            anchor: canonical_anchor(location, hint, kind),
            native,
        }
    }

    /// Unqualified item name.
    pub fn item_name(&self) -> &str {
        split_context_item(&self.hint)
            .map(|(_, item)| item)
            .unwrap_or(&self.hint)
    }
}

// ---------------------------------------------------------------------------
// Anchors
// ---------------------------------------------------------------------------

/// Splits `Owner.Item`, `Owner:Item` or `Owner::Item` at the last separator,
/// preferring `::` over `:` over `.`.
pub fn split_context_item(text: &str) -> Option<(&str, &str)> {
    for sep in ["::", ":", "."] {
        if let Some((owner, item)) = text.rsplit_once(sep) {
            if !owner.is_empty() && !item.is_empty() {
                return Some((owner, item));
            }
        }
    }
    None
}

fn unusable_location(location: &str) -> bool {
    let location = location.trim();
    location.is_empty() || location == "/" || location.contains("None")
}

/// Canonical anchor for a sub-graph.
///
/// Location-defined kinds key on the normalized location (falling back to
/// the hint when the location is unusable); custom events key on the hint;
/// interface members key on `Interface:Function` so every implementer's call
/// sites share one anchor.
pub fn canonical_anchor(location: &str, hint: &str, kind: SubgraphKind) -> String {
    let key = match kind {
        SubgraphKind::CustomEventGraph => hint.to_string(),
        SubgraphKind::Interface => match split_context_item(hint) {
            Some((iface, func)) => format!("{}:{}", simple_name_from_path(iface), func),
            None => hint.to_string(),
        },
        SubgraphKind::Function | SubgraphKind::Macro | SubgraphKind::CollapsedGraph => {
            if unusable_location(location) {
                hint.to_string()
            } else {
                normalize_location(location)
            }
        }
    };
    let unified = key.replace("::", ":").replace('.', ":");
    // Only owner segments carry class affixes; the item name is kept as is.
    let mut segments: Vec<&str> = unified.split(':').collect();
    let item = segments.pop().unwrap_or_default();
    let mut stripped: Vec<&str> = segments
        .into_iter()
        .map(|seg| {
            let seg = seg.strip_prefix("Default__").unwrap_or(seg);
            seg.strip_suffix("_C").unwrap_or(seg)
        })
        .collect();
    stripped.push(item);
    sanitize_anchor(&stripped.join(":"))
}

/// Lowercase, hyphenated, alphanumeric anchor token.
pub fn sanitize_anchor(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if matches!(c, '.' | '_' | '/' | ':' | ' ' | '-') && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "bp-anchor".to_string()
    } else if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("bp-{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Call-site label: the bare item name inside its own scope, otherwise the
/// owner-qualified hint.
pub fn display_name(hint: &str, scope: &str) -> String {
    match split_context_item(hint) {
        Some((owner, item)) if owner == scope || simple_name_from_path(owner) == scope => {
            item.to_string()
        }
        Some((owner, item)) => format!("{}.{}", simple_name_from_path(owner), item),
        None => hint.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Identification
// ---------------------------------------------------------------------------

fn is_native_owner(path: &str) -> bool {
    path.contains("/Script/")
}

fn is_native_macro(path: &str) -> bool {
    let path = path.trim();
    path.is_empty() || path.contains("StandardMacros") || path.starts_with("/Engine/")
}

fn blueprint_name(view: &NodeView<'_>) -> String {
    if view.graph.blueprint.is_empty() {
        simple_name_from_path(view.graph.asset_path())
    } else {
        view.graph.blueprint.clone()
    }
}

/// Called function name: the recorded `FunctionName`, else the node name.
pub(crate) fn function_name<'g>(view: &NodeView<'g>) -> &'g str {
    view.property("FunctionName")
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| view.name())
}

fn interface_reference(iface_path: &str, func: &str) -> SubgraphReference {
    let iface = owner_name(iface_path);
    let location = format!("{}:{}", asset_of_path(iface_path), func);
    SubgraphReference::new(
        SubgraphKind::Interface,
        &location,
        &format!("{iface}.{func}"),
        is_native_owner(iface_path),
    )
}

/// Identifies a call into a separately defined sub-graph.
pub fn identify(view: &NodeView<'_>) -> Option<SubgraphReference> {
    match view.kind() {
        NodeKind::CallFunction | NodeKind::CallParentFunction => {
            let func = function_name(view);
            if let Some(iface) = view.property("InterfaceName").filter(|i| !i.is_empty()) {
                return Some(interface_reference(iface, func));
            }
            let owner_path = view.property("FunctionOwnerClass").unwrap_or("").trim();
            let (asset, owner) = if owner_path.is_empty() {
                (view.graph.asset_path().to_string(), blueprint_name(view))
            } else {
                (asset_of_path(owner_path).to_string(), owner_name(owner_path))
            };
            let hint = format!("{owner}.{func}");
            let native = is_native_owner(owner_path);
            if view.flag("IsCustomEvent") {
                let location = format!("{asset}:{func}");
                return Some(SubgraphReference::new(
                    SubgraphKind::CustomEventGraph,
                    &location,
                    &hint,
                    native,
                ));
            }
            let location = view
                .property("FunctionGraph")
                .filter(|g| !g.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{asset}:{func}"));
            Some(SubgraphReference::new(
                SubgraphKind::Function,
                &location,
                &hint,
                native,
            ))
        }
        NodeKind::Message => {
            let func = function_name(view);
            let iface = view
                .property("InterfaceName")
                .or_else(|| view.property("FunctionOwnerClass"))
                .unwrap_or("");
            Some(interface_reference(iface, func))
        }
        NodeKind::MacroInstance => {
            let path = view.property("MacroGraph").unwrap_or("").trim();
            let name = if path.is_empty() {
                view.name()
            } else {
                item_of_location(path)
            };
            let asset = simple_name_from_path(asset_of_path(
                path.split(':').next().unwrap_or(path),
            ));
            let hint = if asset.is_empty() {
                name.to_string()
            } else {
                format!("{asset}.{name}")
            };
            Some(SubgraphReference::new(
                SubgraphKind::Macro,
                path,
                &hint,
                is_native_macro(path),
            ))
        }
        NodeKind::Composite => {
            let location = view
                .property("BoundGraph")
                .filter(|g| !g.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}:{}", view.graph.asset_path(), view.name()));
            let hint = format!("{}.{}", blueprint_name(view), view.name());
            Some(SubgraphReference::new(
                SubgraphKind::CollapsedGraph,
                &location,
                &hint,
                false,
            ))
        }
        _ => None,
    }
}
