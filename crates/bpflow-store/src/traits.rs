//! The [`GraphProvider`] trait: the engine's only window onto stored graphs.
//!
//! Location keys have the form `<asset path>:<graph name>`, for example
//! `/Game/MyAsset:EventGraph` or `/Game/MyAsset:Foo`. Exporters sometimes
//! write the generated-class spelling of the asset (`/Game/MyAsset.MyAsset_C`)
//! or a `::` separator; [`normalize_location`] folds those into one key.

use bpflow_core::Graph;

use crate::error::StoreError;

/// Synchronous source of graphs keyed by location.
///
/// Implementations hand out shared references that live as long as the
/// provider, so a trace can hold several graphs at once without cloning.
pub trait GraphProvider {
    /// The graph stored under a location key, if any.
    fn graph(&self, location: &str) -> Option<&Graph>;

    /// Every stored location key, in a stable order.
    fn locations(&self) -> Vec<&str>;

    /// Like [`GraphProvider::graph`], but a missing graph is an error.
    fn require(&self, location: &str) -> Result<&Graph, StoreError> {
        self.graph(location).ok_or_else(|| StoreError::NotFound {
            location: location.to_string(),
        })
    }

    /// All graphs whose location lies in the given asset.
    fn graphs_in_asset(&self, asset: &str) -> Vec<&Graph> {
        let wanted = normalize_location(asset);
        self.locations()
            .into_iter()
            .filter_map(|loc| self.graph(loc))
            .filter(|g| normalize_location(g.asset_path()) == wanted)
            .collect()
    }
}

/// Canonical spelling of a location key.
///
/// `::` becomes `:`, and a generated-class asset suffix (`.MyAsset_C`) is
/// dropped from the asset part.
pub fn normalize_location(key: &str) -> String {
    let key = key.trim().replace("::", ":");
    let (asset, item) = match key.split_once(':') {
        Some((asset, item)) => (asset, Some(item)),
        None => (key.as_str(), None),
    };
    let asset = match asset.rsplit_once('/') {
        Some((dir, last)) => {
            let last = last.split('.').next().unwrap_or(last);
            format!("{dir}/{last}")
        }
        None => asset.split('.').next().unwrap_or(asset).to_string(),
    };
    match item {
        Some(item) => format!("{asset}:{item}"),
        None => asset,
    }
}
