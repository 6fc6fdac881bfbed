//! Loading graph documents from JSON files.
//!
//! A file holds either one [`GraphDocument`] or an array of them. Directories
//! are scanned (non-recursively) for `*.json` files in sorted path order so
//! that the resulting provider is identical across runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use bpflow_core::{Graph, GraphDocument};

use crate::error::StoreError;
use crate::memory::InMemoryProvider;

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentSet {
    One(Box<GraphDocument>),
    Many(Vec<GraphDocument>),
}

fn read_to_string(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses every graph document in one JSON text into `provider`.
pub fn load_str(provider: &mut InMemoryProvider, json: &str) -> Result<usize, StoreError> {
    let docs = match serde_json::from_str::<DocumentSet>(json)? {
        DocumentSet::One(doc) => vec![*doc],
        DocumentSet::Many(docs) => docs,
    };
    let count = docs.len();
    for doc in docs {
        provider.insert(Graph::from_document(doc)?)?;
    }
    Ok(count)
}

/// Loads one JSON file.
pub fn load_file(path: &Path) -> Result<InMemoryProvider, StoreError> {
    let mut provider = InMemoryProvider::new();
    let json = read_to_string(path)?;
    let count = load_str(&mut provider, &json)?;
    tracing::debug!(path = %path.display(), graphs = count, "loaded graph file");
    Ok(provider)
}

/// Loads every `*.json` file directly inside a directory.
pub fn load_directory(dir: &Path) -> Result<InMemoryProvider, StoreError> {
    let io_err = |source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let mut provider = InMemoryProvider::new();
    for file in &files {
        let json = read_to_string(file)?;
        let count = load_str(&mut provider, &json)?;
        tracing::debug!(path = %file.display(), graphs = count, "loaded graph file");
    }
    Ok(provider)
}

/// Loads a file or a directory, whichever `path` names.
pub fn load_path(path: &Path) -> Result<InMemoryProvider, StoreError> {
    if path.is_dir() {
        load_directory(path)
    } else {
        load_file(path)
    }
}
