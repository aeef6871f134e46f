use async_trait::async_trait;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use ragkit_core::{EmbeddingProvider, Error, IndexedEmbeddings, Result};

/// Deterministic bag-of-words embedder for tests and offline development.
///
/// Each lowercased word is hashed into one component; the result is
/// L2-normalized, so texts sharing words end up close under cosine distance.
#[derive(Debug, Default, Clone)]
pub struct FakeEmbedder;

impl FakeEmbedder {
    pub fn new() -> Self {
        Self
    }

    pub fn embed_text(&self, text: &str, dimensions: usize) -> Vec<f32> {
        let mut v = vec![0f32; dimensions];
        if dimensions == 0 {
            return v;
        }
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase);
        for (i, word) in words.enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            word.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % dimensions as u64) as usize;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += 0.5 + val + (i % 3) as f32 * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    fn provider_id(&self) -> &str {
        "fake:xxhash64"
    }

    async fn embed(&self, texts: &[String], dimensions: usize) -> Result<IndexedEmbeddings> {
        if dimensions == 0 {
            return Err(Error::invalid("dimensions must be greater than 0"));
        }
        Ok(texts.iter().enumerate().map(|(i, t)| (i, self.embed_text(t, dimensions))).collect())
    }
}
