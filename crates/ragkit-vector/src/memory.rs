use async_trait::async_trait;
use std::sync::RwLock;

use ragkit_core::ranking::rank_records;
use ragkit_core::{Error, NewRecord, Result, SearchParams, StoredRecord, VectorStore};

#[derive(Debug, Default)]
struct State {
    records: Vec<StoredRecord>,
    next_key: u64,
}

/// Process-local store. Every mutation happens under one write lock, so a
/// concurrent search sees the data set either before or after it.
#[derive(Debug)]
pub struct MemoryVectorStore {
    dimensions: usize,
    state: RwLock<State>,
}

impl MemoryVectorStore {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(Error::invalid("dimensions must be greater than 0"));
        }
        Ok(Self { dimensions, state: RwLock::new(State::default()) })
    }

    /// Copy of everything currently stored, in insertion order.
    pub fn snapshot(&self) -> Result<Vec<StoredRecord>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.records.clone())
    }

    fn check_records(&self, records: &[NewRecord]) -> Result<()> {
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != self.dimensions) {
            return Err(Error::dimension_mismatch(self.dimensions, bad.embedding.len()));
        }
        Ok(())
    }
}

fn stored(first_key: u64, records: Vec<NewRecord>) -> Vec<StoredRecord> {
    (first_key..)
        .zip(records)
        .map(|(key, r)| StoredRecord { key, text: r.text, embedding: r.embedding, source: r.source })
        .collect()
}

fn poisoned<T>(_: T) -> Error {
    Error::storage("memory store lock poisoned")
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.records.clear();
        state.next_key = 0;
        Ok(())
    }

    async fn insert_batch(&self, records: Vec<NewRecord>) -> Result<usize> {
        self.check_records(&records)?;
        let n = records.len();
        let mut state = self.state.write().map_err(poisoned)?;
        let first_key = state.next_key;
        state.records.extend(stored(first_key, records));
        state.next_key = first_key + n as u64;
        Ok(n)
    }

    async fn replace_all(&self, records: Vec<NewRecord>) -> Result<usize> {
        self.check_records(&records)?;
        let n = records.len();
        let fresh = stored(0, records);
        let mut state = self.state.write().map_err(poisoned)?;
        state.records = fresh;
        state.next_key = n as u64;
        Ok(n)
    }

    async fn search(&self, query: &[f32], params: &SearchParams) -> Result<Vec<String>> {
        let state = self.state.read().map_err(poisoned)?;
        rank_records(query, self.dimensions, &state.records, *params)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.state.read().map_err(poisoned)?.records.len())
    }
}
