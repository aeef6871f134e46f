//! Threshold filtering and top-k selection over scored records.
//!
//! Stores feed every candidate through [`Ranking::offer`] (in any order) and
//! call [`Ranking::finish`] once. The result is ordered by ascending distance,
//! ties broken by ascending record key, so it does not depend on the order in
//! which a backend happens to scan its rows.

use crate::error::{Error, Result};
use crate::types::{SearchParams, StoredRecord};

#[derive(Debug)]
struct Hit {
    key: u64,
    distance: f64,
    text: String,
}

#[derive(Debug)]
pub struct Ranking<'q> {
    query: &'q [f32],
    params: SearchParams,
    hits: Vec<Hit>,
}

impl<'q> Ranking<'q> {
    /// Start a ranking for `query`, which must have `dimensions` components.
    pub fn new(query: &'q [f32], dimensions: usize, params: SearchParams) -> Result<Self> {
        if query.len() != dimensions {
            return Err(Error::dimension_mismatch(dimensions, query.len()));
        }
        Ok(Self { query, params, hits: Vec::new() })
    }

    /// Score one stored record and keep it if it is strictly under the threshold.
    pub fn offer(&mut self, key: u64, text: &str, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.query.len() {
            return Err(Error::dimension_mismatch(self.query.len(), embedding.len()));
        }
        let distance = self.params.metric.distance(self.query, embedding);
        // NaN compares false and is dropped here
        if distance < self.params.threshold {
            self.hits.push(Hit { key, distance, text: text.to_string() });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Best match first, at most `top_k` texts.
    pub fn finish(self) -> Vec<String> {
        let mut hits = self.hits;
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.key.cmp(&b.key)));
        hits.truncate(self.params.top_k);
        hits.into_iter().map(|h| h.text).collect()
    }
}

/// Rank an in-memory slice of records.
pub fn rank_records(
    query: &[f32],
    dimensions: usize,
    records: &[StoredRecord],
    params: SearchParams,
) -> Result<Vec<String>> {
    let mut ranking = Ranking::new(query, dimensions, params)?;
    for record in records {
        ranking.offer(record.key, &record.text, &record.embedding)?;
    }
    Ok(ranking.finish())
}
