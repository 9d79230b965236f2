//! Vocabulary file loading.
//!
//! Reading and JSON parsing are the only fallible steps. Once a document
//! parses, [`normalize`] takes over and never fails.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::model::Dataset;
use crate::normalizer::normalize;

/// Default file name for the vocabulary document.
pub const DEFAULT_DATA_FILE: &str = "words.json";

/// Read the vocabulary file at `path` as untyped JSON.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content, path)
}

/// Read and normalize the vocabulary file at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let dataset = normalize(&load_document(path)?);
    tracing::info!(
        path = %path.display(),
        units = dataset.units.len(),
        words = dataset.word_count(),
        "vocabulary loaded"
    );
    Ok(dataset)
}

/// Parse and normalize a JSON string (useful for testing).
pub fn load_dataset_str(content: &str, source_path: &Path) -> Result<Dataset, LoadError> {
    Ok(normalize(&parse_document(content, source_path)?))
}

fn parse_document(content: &str, source_path: &Path) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::Parse {
        path: source_path.to_path_buf(),
        source,
    })
}
