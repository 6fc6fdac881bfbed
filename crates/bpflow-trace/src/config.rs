//! Trace configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one trace invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Maximum nesting depth of the execution walk. Default: 70.
    pub max_trace_depth: usize,
    /// Maximum recursion depth of one data resolution. Default: 15.
    pub max_resolve_depth: usize,
    /// Maximum hops when skipping reroute nodes. Default: 20.
    pub max_skip_hops: usize,
    /// List every argument, including trivial defaults.
    pub show_all_arguments: bool,
    /// Summarize calls into user sub-graphs instead of expanding their bodies.
    pub symbolic: bool,
    /// Trace collapsed graphs in place instead of linking to a definition.
    pub inline_collapsed_graphs: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            max_trace_depth: 70,
            max_resolve_depth: 15,
            max_skip_hops: 20,
            show_all_arguments: false,
            symbolic: false,
            inline_collapsed_graphs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TraceConfig::default();
        assert_eq!(config.max_trace_depth, 70);
        assert_eq!(config.max_resolve_depth, 15);
        assert_eq!(config.max_skip_hops, 20);
        assert!(!config.show_all_arguments);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: TraceConfig = serde_json::from_str(r#"{ "symbolic": true }"#).unwrap();
        assert!(config.symbolic);
        assert_eq!(config.max_trace_depth, 70);
    }
}
