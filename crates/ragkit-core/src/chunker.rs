//! Fixed-size, overlapping character windows.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows. Must be below `chunk_size`.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 500, overlap: 50 }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let cfg = Self { chunk_size, overlap };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::invalid("chunk_size must be greater than 0"));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::invalid(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Cursor advance between windows.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        chunk_text(text, self.chunk_size, self.overlap)
    }
}

/// Split `text` into windows of `chunk_size` characters, each starting
/// `chunk_size - overlap` characters after the previous one.
///
/// The last window is clipped to the end of the text and emission stops as
/// soon as a window reaches it, so the tail is covered exactly once. Lengths
/// are counted in `char`s; windows never split a code point.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    let cfg = ChunkingConfig { chunk_size, overlap };
    cfg.validate()?;

    if text.is_empty() {
        return Ok(Vec::new());
    }

    // byte offset of every char boundary, including the end of the string
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = bounds.len() - 1;
    if len <= chunk_size {
        return Ok(vec![text.to_string()]);
    }

    let stride = cfg.stride();
    let mut chunks = Vec::with_capacity(expected_chunk_count(len, chunk_size, overlap));
    let mut start = 0usize;
    loop {
        let end = (start + chunk_size).min(len);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == len {
            break;
        }
        start += stride;
    }
    Ok(chunks)
}

/// Number of windows [`chunk_text`] emits for a text of `len` characters.
pub fn expected_chunk_count(len: usize, chunk_size: usize, overlap: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if len <= chunk_size {
        return 1;
    }
    let stride = chunk_size.saturating_sub(overlap).max(1);
    1 + (len - chunk_size).div_ceil(stride)
}
