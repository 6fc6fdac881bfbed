//! Document assembly: root traces followed by one section per referenced
//! sub-graph definition.

use bpflow_core::{Graph, NodeId, NodeKind, NodeView};
use bpflow_store::GraphProvider;
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::config::TraceConfig;
use crate::error::TraceError;
use crate::names::item_of_location;
use crate::path::ExecutionTrace;
use crate::render::Renderer;
use crate::span::{SpanKind, StyledText};
use crate::tracer::Tracer;
use crate::xref::{sanitize_anchor, SubgraphKind, SubgraphReference};

/// A traced entry point of the root graph.
#[derive(Debug, Clone, PartialEq)]
pub struct RootSection {
    pub anchor: String,
    pub title: StyledText,
    pub trace: ExecutionTrace,
}

/// A rendered sub-graph definition. `trace` is `None` when the provider
/// could not supply the graph or its entry node.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionSection {
    pub reference: SubgraphReference,
    pub title: StyledText,
    pub trace: Option<ExecutionTrace>,
}

/// A complete trace document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub location: String,
    pub roots: Vec<RootSection>,
    pub definitions: Vec<DefinitionSection>,
}

impl Document {
    pub fn render(&self, renderer: &dyn Renderer) -> String {
        let mut out = String::new();
        for root in &self.roots {
            out.push_str(&renderer.heading(&root.anchor, &root.title));
            out.push_str(&root.trace.render(renderer));
            out.push('\n');
        }
        for def in &self.definitions {
            out.push_str(&renderer.heading(&def.reference.anchor, &def.title));
            match &def.trace {
                Some(trace) => out.push_str(&trace.render(renderer)),
                None => {
                    out.push_str(&renderer.begin_trace());
                    out.push_str(&renderer.line(
                        "",
                        &StyledText::styled(SpanKind::Info, "Definition not available"),
                    ));
                    out.push_str(&renderer.end_trace());
                }
            }
            out.push('\n');
        }
        out
    }

    /// Anchors of every section, roots first.
    pub fn anchors(&self) -> Vec<&str> {
        self.roots
            .iter()
            .map(|r| r.anchor.as_str())
            .chain(self.definitions.iter().map(|d| d.reference.anchor.as_str()))
            .collect()
    }
}

/// Builds a [`Document`] from one root graph.
///
/// All traces share one [`Tracer`], so each definition is queued and
/// rendered once per document no matter how many call sites reach it.
pub struct DocumentBuilder<'p> {
    tracer: Tracer<'p>,
}

impl<'p> DocumentBuilder<'p> {
    pub fn new(provider: &'p dyn GraphProvider, config: TraceConfig) -> Self {
        DocumentBuilder {
            tracer: Tracer::new(provider, config),
        }
    }

    /// Traces `start` (or every entry node of the root graph), then drains
    /// the definition queue in discovery order.
    pub fn build(mut self, root: &str, start: Option<&NodeId>) -> Result<Document, TraceError> {
        let graph = self.tracer.require_graph(root)?;
        let starts = match start {
            Some(id) => vec![id.clone()],
            None => graph.entry_nodes(),
        };
        info!(location = root, entries = starts.len(), "building document");

        let mut used = IndexSet::new();
        let mut roots = Vec::with_capacity(starts.len());
        for id in &starts {
            let trace = self.tracer.trace(root, id)?;
            let name = graph.view(id).map(|v| v.name()).unwrap_or_default();
            let anchor = unique_anchor(&mut used, &format!("{} {}", item_of_location(root), name));
            let title = StyledText::styled(SpanKind::GraphName, graph.name.as_str())
                .with_plain(": ")
                .with(SpanKind::EventName, name);
            roots.push(RootSection { anchor, title, trace });
        }

        let mut definitions = Vec::new();
        while let Some(reference) = self.tracer.next_definition() {
            debug!(anchor = %reference.anchor, "rendering definition");
            let title = StyledText::styled(SpanKind::Keyword, reference.kind.label())
                .with_plain(": ")
                .with(SpanKind::GraphName, reference.hint.as_str());
            let trace = match self.definition_start(&reference) {
                Some((location, node)) => Some(self.tracer.trace(&location, &node)?),
                None => {
                    warn!(location = %reference.location, "definition not available");
                    None
                }
            };
            definitions.push(DefinitionSection {
                reference,
                title,
                trace,
            });
        }

        Ok(Document {
            location: root.to_string(),
            roots,
            definitions,
        })
    }

    /// Location and start node of a queued definition.
    fn definition_start(&self, reference: &SubgraphReference) -> Option<(String, NodeId)> {
        let provider = self.tracer.provider();
        if reference.kind == SubgraphKind::CustomEventGraph {
            let asset = reference
                .location
                .split_once(':')
                .map(|(asset, _)| asset)
                .unwrap_or(&reference.location);
            let wanted = reference.item_name();
            return provider.graphs_in_asset(asset).into_iter().find_map(|graph| {
                graph
                    .nodes()
                    .find(|n| n.kind() == &NodeKind::CustomEvent && custom_event_name(n) == wanted)
                    .map(|n| (graph.location.clone(), n.id().clone()))
            });
        }
        let graph = provider.graph(&reference.location)?;
        entry_node(graph, reference.kind).map(|n| (graph.location.clone(), n.id().clone()))
    }
}

fn custom_event_name<'g>(view: &NodeView<'g>) -> &'g str {
    view.property("CustomFunctionName").unwrap_or(view.name())
}

/// Entry node of a definition graph.
fn entry_node(graph: &Graph, kind: SubgraphKind) -> Option<NodeView<'_>> {
    let function_entry = || graph.nodes().find(|n| n.kind() == &NodeKind::FunctionEntry);
    let entry_tunnel = || {
        graph
            .nodes()
            .find(|n| n.kind() == &NodeKind::Tunnel && n.exec_inputs().next().is_none())
    };
    match kind {
        SubgraphKind::Macro | SubgraphKind::CollapsedGraph => entry_tunnel().or_else(function_entry),
        _ => function_entry().or_else(entry_tunnel),
    }
}

fn unique_anchor(used: &mut IndexSet<String>, text: &str) -> String {
    let base = sanitize_anchor(text);
    let mut anchor = base.clone();
    let mut n = 2;
    while !used.insert(anchor.clone()) {
        anchor = format!("{base}-{n}");
        n += 1;
    }
    anchor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_deduplicated() {
        let mut used = IndexSet::new();
        assert_eq!(unique_anchor(&mut used, "EventGraph Event"), "eventgraph-event");
        assert_eq!(unique_anchor(&mut used, "EventGraph Event"), "eventgraph-event-2");
        assert_eq!(unique_anchor(&mut used, "EventGraph_Event"), "eventgraph-event-3");
    }
}
