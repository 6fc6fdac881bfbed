//! The execution-path walk.
//!
//! Starting from one node, the walk follows linked exec outputs depth-first
//! and emits one [`TraceLine`] per step. Linear chains stay at one indent;
//! a node with several linked outputs opens one labelled branch per output.
//!
//! Two sets stop the walk from repeating itself. The *path* set holds the
//! nodes on the current branch and is cloned for every branch, so sibling
//! branches never see each other's nodes. The *processed* set lives in
//! [`TraceState`](crate::state::TraceState) and is shared by the whole
//! trace: a node reached again after it was described renders a short
//! marker instead of its sub-tree.

use bpflow_core::{Graph, NodeKind, NodeView, Pin};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::describe::{standard_macro_name, CapturedEventData};
use crate::error::TraceError;
use crate::render::Renderer;
use crate::span::StyledText;
use crate::state::{CallSiteBinding, NodeKey};
use crate::tracer::Tracer;
use crate::xref::{identify, SubgraphKind, SubgraphReference};

const STEP: &str = "* ";
const BRANCH: &str = "|-- ";
const LAST_BRANCH: &str = "L-- ";
const CONTINUED: &str = "|   ";
const CLOSED: &str = "    ";

/// Single-successor labels that continue without a branch line.
const QUIET_LABELS: [&str; 7] = ["then", "execute", "Completed", "Finished", "Update", "Output", "Result"];

const LOOP_MACROS: [&str; 5] = [
    "ForEachLoop",
    "ForEachLoopWithBreak",
    "ForLoop",
    "ForLoopWithBreak",
    "WhileLoop",
];

/// One rendered line: structural prefix plus styled content.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLine {
    pub prefix: String,
    pub content: StyledText,
}

/// The lines of one traced path and the definitions it discovered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionTrace {
    pub lines: Vec<TraceLine>,
    /// References first queued by this trace, in discovery order.
    pub definitions: Vec<SubgraphReference>,
}

impl ExecutionTrace {
    pub fn render(&self, renderer: &dyn Renderer) -> String {
        let mut out = renderer.begin_trace();
        for line in &self.lines {
            out.push_str(&renderer.line(&line.prefix, &line.content));
        }
        out.push_str(&renderer.end_trace());
        out
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

type PathSet = IndexSet<NodeKey>;

/// A linked exec output and where it lands.
struct Successor<'p> {
    pin: &'p Pin,
    label: String,
    target: Option<(NodeView<'p>, &'p Pin)>,
}

const NUMBERED_STEMS: [&str; 4] = ["Then ", "Out ", "Case ", "then_"];

/// Labels that always appear in this order relative to each other.
const RANKED_LABELS: [&str; 9] = [
    "Loop Body",
    "LoopBody",
    "Completed",
    "True",
    "False",
    "Update",
    "Finished",
    "Is Valid",
    "Is Not Valid",
];

/// Numbered pin names such as `Then 2`, `Out 0` or `then_1`, as
/// `(stem index, number)`.
fn numbered(label: &str) -> Option<(usize, u32)> {
    NUMBERED_STEMS.iter().enumerate().find_map(|(i, stem)| {
        label
            .strip_prefix(stem)
            .and_then(|n| n.trim().parse().ok())
            .map(|n| (i, n))
    })
}

/// Sort key over successor labels: `then` first, ranked labels next in
/// their fixed order, numbered labels by number, everything else by text,
/// unlabelled pins last.
fn successor_key(label: &str) -> (bool, u8, usize, u32, String) {
    if label.is_empty() {
        return (true, 0, 0, 0, String::new());
    }
    if label == "then" {
        return (false, 0, 0, 0, label.to_string());
    }
    if let Some(rank) = RANKED_LABELS.iter().position(|l| *l == label) {
        return (false, 1, rank, 0, label.to_string());
    }
    if let Some((stem, n)) = numbered(label) {
        return (false, 2, stem, n, label.to_string());
    }
    (false, 3, 0, 0, label.to_string())
}

fn is_quiet(label: &str) -> bool {
    label.trim().is_empty() || QUIET_LABELS.iter().any(|q| q.eq_ignore_ascii_case(label))
}

fn marker(text: impl Into<String>) -> StyledText {
    StyledText::plain(text)
}

/// Marker for arriving again at a control structure through one of its
/// re-entry pins.
fn reentry_marker(view: &NodeView<'_>, landing: &Pin) -> Option<StyledText> {
    let name = view.name();
    let pin = landing.display_name();
    let control = standard_macro_name(view).or_else(|| {
        (view.kind() == &NodeKind::MultiGate).then(|| "MultiGate".to_string())
    })?;
    let verb = match (control.as_str(), pin) {
        ("ForEachLoopWithBreak" | "ForLoopWithBreak", "Break") => "Triggers Break on",
        (c, _) if LOOP_MACROS.contains(&c) => "Loops back to start of",
        ("DoN" | "DoOnce", "Reset") => "Triggers Reset on",
        ("DoN", "Enter") => "Path enters",
        ("Gate", "Open") => "Opens",
        ("Gate", "Close") => "Closes",
        ("Gate", "Toggle") => "Toggles",
        ("Gate", "Enter") => "Path enters",
        ("MultiGate", "Reset") => "Resets",
        ("MultiGate", _) => "Path enters",
        _ => return None,
    };
    Some(marker(format!("[{verb} {name} -> {pin} Pin]")))
}

impl<'p> Tracer<'p> {
    /// Traces the execution path starting at `start`.
    pub fn trace(
        &mut self,
        location: &str,
        start: &bpflow_core::NodeId,
    ) -> Result<ExecutionTrace, TraceError> {
        self.trace_with(location, start, None)
    }

    /// Like [`Tracer::trace`], with bound-event data for the start node.
    pub fn trace_with(
        &mut self,
        location: &str,
        start: &bpflow_core::NodeId,
        captured: Option<&CapturedEventData>,
    ) -> Result<ExecutionTrace, TraceError> {
        let graph = self.require_graph(location)?;
        let view = graph.view(start).ok_or_else(|| TraceError::StartNodeNotFound {
            id: start.clone(),
            location: location.to_string(),
        })?;
        debug!(location, start = %start, "tracing execution path");
        self.enter_scope(graph);
        self.discovered.clear();

        let mut lines = Vec::new();
        let mut path = PathSet::new();
        self.walk(graph, view, None, captured, "", 0, &mut path, &mut lines);
        Ok(ExecutionTrace {
            lines,
            definitions: std::mem::take(&mut self.discovered),
        })
    }

    // -----------------------------------------------------------------------
    // Walk
    // -----------------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    fn walk(
        &mut self,
        graph: &'p Graph,
        start: NodeView<'p>,
        landing: Option<&'p Pin>,
        captured: Option<&CapturedEventData>,
        indent: &str,
        depth: usize,
        path: &mut PathSet,
        lines: &mut Vec<TraceLine>,
    ) {
        let step = |lines: &mut Vec<TraceLine>, content: StyledText| {
            lines.push(TraceLine {
                prefix: format!("{indent}{STEP}"),
                content,
            });
        };

        let mut next = Some((start, landing));
        let mut captured = captured;
        let mut depth = depth;

        while let Some((node, landing)) = next.take() {
            if depth > self.config.max_trace_depth {
                warn!(node = %node.id(), "trace depth limit reached");
                step(
                    lines,
                    marker(format!("[Trace Depth Limit Reached ({})]", self.config.max_trace_depth)),
                );
                return;
            }

            let (node, landing) = if node.kind().is_passthrough() {
                match self.skip_passthrough(graph, node, landing) {
                    Ok(found) => found,
                    Err(text) => {
                        step(lines, text);
                        return;
                    }
                }
            } else {
                (node, landing)
            };

            let key = NodeKey::new(&graph.location, node.id());
            let on_path = path.contains(&key);
            if on_path || self.state.is_processed(&key) {
                if let Some(text) = landing.and_then(|pin| reentry_marker(&node, pin)) {
                    step(lines, text);
                    return;
                }
                if on_path {
                    step(lines, marker(format!("[Execution loop back to: {}]", node.name())));
                    return;
                }
                let description = self.describe_step(graph, &node, None);
                step(
                    lines,
                    marker(format!(
                        "[Continue execution at: {} → Previously detailed]",
                        description
                    )),
                );
                let successors = self.successors(graph, &node);
                next = match successors.as_slice() {
                    [only] => only.target.and_then(|(target, pin)| {
                        let key = NodeKey::new(&graph.location, target.id());
                        (!self.state.is_processed(&key)).then_some((target, Some(pin)))
                    }),
                    _ => None,
                };
                depth += 1;
                continue;
            }

            path.insert(key.clone());
            self.state.mark_processed(key);
            let description = self.describe_step(graph, &node, captured.take());
            if !description.is_empty() {
                step(lines, description);
            }

            if let Some(reference) = identify(&node) {
                if reference.kind == SubgraphKind::Interface {
                    debug!(anchor = %reference.anchor, "interface call ends the branch");
                    return;
                }
                if node.kind() == &NodeKind::Composite && self.inlines(&reference) {
                    self.inline_collapsed(graph, &node, &reference, indent, depth, path, lines);
                }
            }

            let successors = self.successors(graph, &node);
            let forced = standard_macro_name(&node)
                .filter(|name| LOOP_MACROS.contains(&name.as_str()) || name == "IsValid");

            if let Some(name) = forced {
                if successors.is_empty() {
                    step(
                        lines,
                        marker(format!("[Path ends after macro '{name}' - no linked exec outputs]")),
                    );
                } else {
                    self.branches(successors, indent, depth, path, lines);
                }
                return;
            }

            match successors.len() {
                0 => {
                    if !matches!(node.kind(), NodeKind::FunctionResult | NodeKind::Tunnel) {
                        step(lines, marker("[Path ends]"));
                    }
                    return;
                }
                1 if is_quiet(&successors[0].label) => {
                    let only = &successors[0];
                    match only.target {
                        Some((target, pin)) => {
                            next = Some((target, Some(pin)));
                            depth += 1;
                        }
                        None => {
                            warn!(pin = %only.pin.name, "exec link leads outside selection");
                            step(lines, marker("[Link outside selection]"));
                            return;
                        }
                    }
                }
                _ => {
                    self.branches(successors, indent, depth, path, lines);
                    return;
                }
            }
        }
    }

    /// Emits one labelled branch per successor, each traced with its own
    /// copy of the path set.
    fn branches(
        &mut self,
        successors: Vec<Successor<'p>>,
        indent: &str,
        depth: usize,
        path: &PathSet,
        lines: &mut Vec<TraceLine>,
    ) {
        let count = successors.len();
        for (idx, successor) in successors.into_iter().enumerate() {
            let last = idx + 1 == count;
            let (connector, nested) = if last { (LAST_BRANCH, CLOSED) } else { (BRANCH, CONTINUED) };
            lines.push(TraceLine {
                prefix: format!("{indent}{connector}"),
                content: StyledText::plain(format!("{}:", successor.label.trim_end_matches(':'))),
            });
            let child_indent = format!("{indent}{nested}");
            match successor.target {
                Some((target, pin)) => {
                    let mut branch_path = path.clone();
                    self.walk(
                        target.graph,
                        target,
                        Some(pin),
                        None,
                        &child_indent,
                        depth + 1,
                        &mut branch_path,
                        lines,
                    );
                }
                None => {
                    warn!(pin = %successor.pin.name, "branch leads outside selection");
                    lines.push(TraceLine {
                        prefix: format!("{child_indent}{STEP}"),
                        content: marker(format!(
                            "[Link outside selection for branch '{}']",
                            successor.pin.name
                        )),
                    });
                }
            }
        }
    }

    /// Linked exec outputs of a node in display order.
    fn successors(&self, graph: &'p Graph, view: &NodeView<'p>) -> Vec<Successor<'p>> {
        let mut successors: Vec<Successor<'p>> = view
            .exec_outputs()
            .filter(|pin| pin.is_linked())
            .map(|pin| {
                let target = graph
                    .targets_of(pin)
                    .find_map(|t| graph.owner_of(t).map(|owner| (owner, t)));
                Successor {
                    pin,
                    label: pin.display_name().to_string(),
                    target,
                }
            })
            .collect();
        successors.sort_by_key(|s| successor_key(&s.label));
        successors
    }

    /// Follows reroute nodes to the next describable node.
    fn skip_passthrough(
        &self,
        graph: &'p Graph,
        start: NodeView<'p>,
        landing: Option<&'p Pin>,
    ) -> Result<(NodeView<'p>, Option<&'p Pin>), StyledText> {
        let limit = self.config.max_skip_hops;
        let mut seen = IndexSet::new();
        let mut current = (start, landing);
        for _ in 0..=limit {
            let (node, _) = current;
            if !node.kind().is_passthrough() {
                if node.is_pure() {
                    return Err(marker(format!(
                        "[Skipped nodes ended on non-executable node {}]",
                        node.name()
                    )));
                }
                return Ok(current);
            }
            if !seen.insert(node.id()) {
                return Err(marker(format!("[Execution loop during skip to {}]", node.name())));
            }
            let mut outputs = node.exec_outputs().peekable();
            if outputs.peek().is_none() {
                return Err(marker("[Path ended - no further executable node found]"));
            }
            let Some(out) = outputs.find(|p| p.is_linked()) else {
                return Err(marker("[Skipped nodes ended in a dead end]"));
            };
            let Some((owner, pin)) = graph
                .targets_of(out)
                .find_map(|t| graph.owner_of(t).map(|owner| (owner, t)))
            else {
                return Err(marker("[Skipped nodes led outside selection]"));
            };
            current = (owner, Some(pin));
        }
        Err(marker(format!(
            "[Trace Depth Limit Reached ({limit}) while skipping nodes]"
        )))
    }

    /// Traces a collapsed graph in place, one level deeper, with the call
    /// node's inputs bound to the graph's entry parameters.
    #[allow(clippy::too_many_arguments)]
    fn inline_collapsed(
        &mut self,
        graph: &'p Graph,
        call: &NodeView<'p>,
        reference: &SubgraphReference,
        indent: &str,
        depth: usize,
        path: &PathSet,
        lines: &mut Vec<TraceLine>,
    ) {
        self.state.claim_anchor(&reference.anchor);
        let Some(sub) = self.provider.graph(&reference.location) else {
            return;
        };
        let Some(entry) = sub
            .nodes()
            .find(|n| n.kind() == &NodeKind::Tunnel && n.exec_inputs().next().is_none())
        else {
            warn!(location = %sub.location, "collapsed graph has no entry tunnel");
            return;
        };

        let mut values = IndexMap::new();
        for input in call.pins().filter(|p| p.is_input() && !p.is_exec()) {
            let value = self.resolve_value(graph, input);
            values.insert(input.name.clone(), value);
        }
        self.state.push_binding(CallSiteBinding {
            location: sub.location.clone(),
            values,
        });
        debug!(location = %sub.location, "inlining collapsed graph");
        let mut sub_path = path.clone();
        let nested = format!("{indent}{CLOSED}");
        self.walk(sub, entry, None, None, &nested, depth + 1, &mut sub_path, lines);
        self.state.pop_binding();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successor_ordering() {
        let mut labels = vec!["False", "True"];
        labels.sort_by_key(|l| successor_key(l));
        assert_eq!(labels, vec!["True", "False"]);

        let mut labels = vec!["Completed", "Loop Body"];
        labels.sort_by_key(|l| successor_key(l));
        assert_eq!(labels, vec!["Loop Body", "Completed"]);

        let mut labels = vec!["Then 10", "Then 2", "Then 0"];
        labels.sort_by_key(|l| successor_key(l));
        assert_eq!(labels, vec!["Then 0", "Then 2", "Then 10"]);

        let mut labels = vec!["B", "then", "A"];
        labels.sort_by_key(|l| successor_key(l));
        assert_eq!(labels, vec!["then", "A", "B"]);
    }

    #[test]
    fn successor_order_ignores_declaration_order() {
        let expected = vec!["True", "False", "Neither", ""];
        for start in [
            vec!["True", "False", "Neither", ""],
            vec!["Neither", "True", "", "False"],
            vec!["", "False", "Neither", "True"],
        ] {
            let mut labels = start;
            labels.sort_by_key(|l| successor_key(l));
            assert_eq!(labels, expected);
        }
    }

    #[test]
    fn quiet_labels() {
        assert!(is_quiet("then"));
        assert!(is_quiet("COMPLETED"));
        assert!(is_quiet(""));
        assert!(!is_quiet("True"));
        assert!(!is_quiet("Loop Body"));
    }
}
