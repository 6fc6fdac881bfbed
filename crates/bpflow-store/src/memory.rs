//! In-memory implementation of [`GraphProvider`].
//!
//! [`InMemoryProvider`] is the backend for tests, for programmatic use, and
//! for the CLI once files are loaded. Graphs are kept in insertion order so
//! that `locations()` is deterministic.

use indexmap::IndexMap;

use bpflow_core::Graph;

use crate::error::StoreError;
use crate::traits::{normalize_location, GraphProvider};

/// Graphs held in memory, keyed by normalized location.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    graphs: IndexMap<String, Graph>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        InMemoryProvider::default()
    }

    /// Stores a graph under its own location key.
    pub fn insert(&mut self, graph: Graph) -> Result<(), StoreError> {
        let key = normalize_location(&graph.location);
        if self.graphs.contains_key(&key) {
            return Err(StoreError::DuplicateLocation { location: key });
        }
        tracing::debug!(location = %key, nodes = graph.node_count(), "graph stored");
        self.graphs.insert(key, graph);
        Ok(())
    }

    /// Builder-style insert that replaces any graph at the same location.
    pub fn with_graph(mut self, graph: Graph) -> Self {
        let key = normalize_location(&graph.location);
        self.graphs.insert(key, graph);
        self
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

impl GraphProvider for InMemoryProvider {
    fn graph(&self, location: &str) -> Option<&Graph> {
        self.graphs
            .get(location)
            .or_else(|| self.graphs.get(&normalize_location(location)))
    }

    fn locations(&self) -> Vec<&str> {
        self.graphs.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(location: &str) -> Graph {
        Graph::new(location, "G", "A")
    }

    #[test]
    fn lookup_tolerates_class_spelling() {
        let provider = InMemoryProvider::new().with_graph(graph("/Game/MyAsset:Foo"));
        assert!(provider.graph("/Game/MyAsset:Foo").is_some());
        assert!(provider.graph("/Game/MyAsset.MyAsset_C:Foo").is_some());
        assert!(provider.graph("/Game/MyAsset:Bar").is_none());
    }

    #[test]
    fn duplicate_locations_are_rejected() {
        let mut provider = InMemoryProvider::new();
        provider.insert(graph("/Game/A:G")).unwrap();
        assert!(matches!(
            provider.insert(graph("/Game/A.A_C:G")),
            Err(StoreError::DuplicateLocation { .. })
        ));
    }

    #[test]
    fn require_reports_missing_location() {
        let provider = InMemoryProvider::new();
        let err = provider.require("/Game/Nope:G").unwrap_err();
        assert_eq!(err.to_string(), "graph not found: /Game/Nope:G");
    }

    #[test]
    fn graphs_in_asset_filters_by_asset_path() {
        let provider = InMemoryProvider::new()
            .with_graph(graph("/Game/A:EventGraph"))
            .with_graph(graph("/Game/A:Foo"))
            .with_graph(graph("/Game/B:EventGraph"));
        let found: Vec<_> = provider
            .graphs_in_asset("/Game/A")
            .into_iter()
            .map(|g| g.location.clone())
            .collect();
        assert_eq!(found, vec!["/Game/A:EventGraph", "/Game/A:Foo"]);
        assert_eq!(provider.locations().len(), 3);
    }
}
