//! Domain types shared by the chunker, the providers and the stores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::distance::DistanceMetric;

/// Embedding vectors keyed by the position of their input text in the request.
///
/// Providers may answer out of order or (on failure) with gaps, so callers must
/// never rely on iteration order matching the input order.
pub type IndexedEmbeddings = BTreeMap<usize, Vec<f32>>;

/// Raw input text plus the identifier it came from (usually a file path).
///
/// Only lives for the duration of an ingestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// A `(text, embedding)` pair waiting to be written.
///
/// `source` is the identifier of the document the chunk was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub text: String,
    pub embedding: Vec<f32>,
    pub source: String,
}

/// A persisted record. `key` is assigned by the store and increases with
/// insertion order; it breaks ties between equally distant records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub key: u64,
    pub text: String,
    pub embedding: Vec<f32>,
    pub source: String,
}

/// Query-time knobs handed to [`VectorStore::search`](crate::traits::VectorStore::search).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub metric: DistanceMetric,
    pub top_k: usize,
    /// Records are kept only when `distance < threshold`.
    pub threshold: f64,
}
