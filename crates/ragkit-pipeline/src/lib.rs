//! Ingestion (chunk → embed → store) and retrieval (embed → search) over any
//! [`VectorStore`], with any [`EmbeddingProvider`].

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use ragkit_core::config::Settings;
use ragkit_core::embedding::align_embeddings;
use ragkit_core::{
    ChunkingConfig, Document, EmbeddingProvider, Error, NewRecord, Result, SearchParams, VectorStore,
};

pub mod prompt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOptions {
    pub chunking: ChunkingConfig,
    pub dimensions: usize,
    /// Replace the whole store instead of appending.
    pub reset: bool,
}

impl IngestOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            chunking: settings.chunking,
            dimensions: settings.embedding.dimensions,
            reset: settings.store.truncate_before_insert,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        check_dimensions(self.dimensions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrieveOptions {
    pub params: SearchParams,
    pub dimensions: usize,
}

impl RetrieveOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self { params: settings.retrieval.search_params(), dimensions: settings.embedding.dimensions }
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.dimensions)?;
        if self.params.threshold.is_nan() {
            return Err(Error::invalid("min_score_threshold must be a number"));
        }
        Ok(())
    }
}

fn check_dimensions(dimensions: usize) -> Result<()> {
    if dimensions == 0 {
        return Err(Error::invalid("dimensions must be greater than 0"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub stored: usize,
    pub replaced: bool,
}

pub struct RagPipeline<S>
where
    S: VectorStore,
{
    provider: Arc<dyn EmbeddingProvider>,
    store: S,
    embed_timeout: Option<Duration>,
}

impl<S> RagPipeline<S>
where
    S: VectorStore,
{
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: S) -> Self {
        Self { provider, store, embed_timeout: None }
    }

    /// Bound every provider call; expiry fails the operation as a provider error.
    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest a single text under `source`.
    pub async fn ingest(&self, source: &str, text: &str, opts: &IngestOptions) -> Result<IngestReport> {
        self.ingest_documents(&[Document::new(source, text)], opts).await
    }

    /// Chunk every document, embed all chunks in one call, then write them in
    /// one batch.
    ///
    /// The store is only touched after every chunk has an embedding, so a
    /// provider failure leaves existing data as it was.
    pub async fn ingest_documents(&self, docs: &[Document], opts: &IngestOptions) -> Result<IngestReport> {
        opts.validate()?;
        self.check_store_dimensions(opts.dimensions)?;

        let mut texts = Vec::new();
        let mut sources = Vec::new();
        for doc in docs {
            let chunks = opts.chunking.chunk(&doc.text)?;
            debug!(source = %doc.id, chunks = chunks.len(), "chunked document");
            for chunk in chunks {
                texts.push(chunk);
                sources.push(doc.id.clone());
            }
        }

        let vectors = if texts.is_empty() { Vec::new() } else { self.embed(&texts, opts.dimensions).await? };
        let records: Vec<NewRecord> = texts
            .into_iter()
            .zip(vectors)
            .zip(sources)
            .map(|((text, embedding), source)| NewRecord { text, embedding, source })
            .collect();
        let chunks = records.len();

        let stored = if opts.reset {
            self.store.replace_all(records).await?
        } else {
            self.store.insert_batch(records).await?
        };
        info!(documents = docs.len(), chunks, stored, reset = opts.reset, "ingestion complete");
        Ok(IngestReport { documents: docs.len(), chunks, stored, replaced: opts.reset })
    }

    /// Texts of the stored chunks closest to `query`, best first. An empty
    /// result means nothing passed the threshold.
    pub async fn retrieve(&self, query: &str, opts: &RetrieveOptions) -> Result<Vec<String>> {
        opts.validate()?;
        self.check_store_dimensions(opts.dimensions)?;
        let mut vectors = self.embed(&[query.to_string()], opts.dimensions).await?;
        let query_vector = vectors.pop().ok_or_else(|| Error::provider("no embedding returned for the query"))?;
        let hits = self.store.search(&query_vector, &opts.params).await?;
        info!(metric = %opts.params.metric, top_k = opts.params.top_k, hits = hits.len(), "retrieved context");
        Ok(hits)
    }

    fn check_store_dimensions(&self, dimensions: usize) -> Result<()> {
        let stored = self.store.dimensions();
        if stored != dimensions {
            return Err(Error::dimension_mismatch(stored, dimensions));
        }
        Ok(())
    }

    async fn embed(&self, texts: &[String], dimensions: usize) -> Result<Vec<Vec<f32>>> {
        debug!(provider = self.provider.provider_id(), inputs = texts.len(), dimensions, "embedding");
        let call = self.provider.embed(texts, dimensions);
        let embeddings = match self.embed_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| Error::Provider(format!("embedding call timed out after {limit:?}")))??,
            None => call.await?,
        };
        align_embeddings(embeddings, texts.len(), dimensions)
    }
}
