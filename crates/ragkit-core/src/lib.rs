pub mod chunker;
pub mod config;
pub mod distance;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod ranking;
pub mod traits;
pub mod types;

pub use chunker::{chunk_text, ChunkingConfig};
pub use distance::DistanceMetric;
pub use error::{Error, Result};
pub use traits::{EmbeddingProvider, VectorStore};
pub use types::{Document, IndexedEmbeddings, NewRecord, SearchParams, StoredRecord};
