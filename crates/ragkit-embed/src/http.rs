//! Remote embedding provider speaking the OpenAI/DIAL `/embeddings` protocol.
//!
//! Request: `{"input": [...], "dimensions": N}` with an `Api-Key` header.
//! Response: `{"data": [{"index": i, "embedding": [...]}, ...]}`. Inputs larger
//! than `batch_size` are split across requests and each response's `index` is
//! shifted by the sub-batch offset.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ragkit_core::config::EmbeddingSettings;
use ragkit_core::{EmbeddingProvider, Error, IndexedEmbeddings, Result};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    dimensions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    pub index: usize,
    pub embedding: Vec<f32>,
}

pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
    batch_size: usize,
    id: String,
}

impl HttpEmbeddingProvider {
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Configuration("embedding.api_key cannot be empty".to_string()))?
            .to_string();
        if settings.batch_size == 0 {
            return Err(Error::invalid("embedding.batch_size must be greater than 0"));
        }
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(Error::provider)?;
        let url = settings.url();
        info!(%url, batch_size = settings.batch_size, "initialized HTTP embedding provider");
        Ok(Self {
            client,
            url,
            api_key,
            batch_size: settings.batch_size,
            id: format!("http:{}", settings.deployment),
        })
    }

    async fn request(&self, texts: &[String], dimensions: usize) -> Result<EmbeddingResponse> {
        let response = self
            .client
            .post(&self.url)
            .header("Api-Key", &self.api_key)
            .json(&EmbeddingRequest { input: texts, dimensions })
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;
        if !status.is_success() {
            return Err(Error::Provider(format!("HTTP {status}: {body}")));
        }
        serde_json::from_str(&body).map_err(|e| Error::Provider(format!("malformed embeddings response: {e}")))
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    async fn embed(&self, texts: &[String], dimensions: usize) -> Result<IndexedEmbeddings> {
        let mut out = IndexedEmbeddings::new();
        for (n, batch) in texts.chunks(self.batch_size).enumerate() {
            let offset = n * self.batch_size;
            debug!(offset, size = batch.len(), "requesting embeddings");
            let response = self.request(batch, dimensions).await?;
            merge_response(response, offset, batch.len(), &mut out)?;
        }
        Ok(out)
    }
}

/// Fold one sub-batch response into `out`, shifting indices by `offset`.
///
/// Indices outside `0..len` or reported twice make the response malformed.
/// Missing indices are left for the caller's alignment step to reject.
pub fn merge_response(
    response: EmbeddingResponse,
    offset: usize,
    len: usize,
    out: &mut IndexedEmbeddings,
) -> Result<()> {
    for item in response.data {
        if item.index >= len {
            return Err(Error::Provider(format!(
                "embedding index {} out of range for a batch of {len}",
                item.index
            )));
        }
        if out.insert(offset + item.index, item.embedding).is_some() {
            return Err(Error::Provider(format!("embedding index {} reported twice", item.index)));
        }
    }
    Ok(())
}

fn request_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Provider(format!("embeddings request timed out: {e}"))
    } else {
        Error::Provider(format!("embeddings request failed: {e}"))
    }
}
