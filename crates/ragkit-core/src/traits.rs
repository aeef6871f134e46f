use async_trait::async_trait;

use crate::error::Result;
use crate::types::{IndexedEmbeddings, NewRecord, SearchParams};

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `http:text-embedding-3-small-1`).
    fn provider_id(&self) -> &str;

    /// Embed `texts`, returning one vector of length `dimensions` per input,
    /// keyed by the input's position.
    ///
    /// The map may come back incomplete; callers go through
    /// [`align_embeddings`](crate::embedding::align_embeddings) before use.
    async fn embed(&self, texts: &[String], dimensions: usize) -> Result<IndexedEmbeddings>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Dimensionality every stored and query vector must have.
    fn dimensions(&self) -> usize;

    /// Remove every record.
    async fn clear(&self) -> Result<()>;

    /// Append records. Either all of them become visible or none do.
    async fn insert_batch(&self, records: Vec<NewRecord>) -> Result<usize>;

    /// Clear and insert as one commit: readers observe the old data set or the
    /// new one, never an empty or partial table.
    async fn replace_all(&self, records: Vec<NewRecord>) -> Result<usize>;

    /// Texts of the records closest to `query`, best first.
    async fn search(&self, query: &[f32], params: &SearchParams) -> Result<Vec<String>>;

    async fn count(&self) -> Result<usize>;
}
