use crate::error::{Error, Result};
use crate::types::IndexedEmbeddings;

/// Turn a provider response into one vector per input text, in input order.
///
/// Vectors are re-keyed by the index the provider reported, never by their
/// position in the response. Every index in `0..expected` must be present
/// exactly once with `dimensions` components; anything else fails the whole
/// batch.
pub fn align_embeddings(
    mut embeddings: IndexedEmbeddings,
    expected: usize,
    dimensions: usize,
) -> Result<Vec<Vec<f32>>> {
    if let Some((&stray, _)) = embeddings.range(expected..).next() {
        return Err(Error::provider(format!(
            "response contains index {stray} but only {expected} inputs were sent"
        )));
    }
    let mut aligned = Vec::with_capacity(expected);
    for i in 0..expected {
        let vector = embeddings
            .remove(&i)
            .ok_or_else(|| Error::provider(format!("response is missing the embedding for input {i}")))?;
        if vector.len() != dimensions {
            return Err(Error::provider(format!(
                "embedding for input {i} has {} dimensions, requested {dimensions}",
                vector.len()
            )));
        }
        aligned.push(vector);
    }
    Ok(aligned)
}
