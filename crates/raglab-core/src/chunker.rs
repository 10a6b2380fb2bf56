//! Fixed-stride overlapping text chunking.
//!
//! Offsets and sizes are measured in characters, not bytes, so multi-byte
//! input never splits a code point.

use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

/// How documents are cut into chunks before embedding.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 200, chunk_overlap: 40 }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }
}

fn validate(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::InvalidConfig("chunk_size must be > 0".to_string()));
    }
    if chunk_overlap >= chunk_size {
        return Err(Error::InvalidConfig(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            chunk_overlap, chunk_size
        )));
    }
    Ok(())
}

/// Split `text` into overlapping `(offset, text)` spans.
///
/// Each span holds at most `chunk_size` characters; consecutive spans start
/// exactly `chunk_size - chunk_overlap` characters apart, so the trailing
/// `chunk_overlap` characters of one span reappear at the head of the next.
/// Empty input yields no spans; input shorter than `chunk_size` yields one.
pub fn split_with_overlap(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<(usize, String)>> {
    validate(chunk_size, chunk_overlap)?;
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(vec![]);
    }
    let stride = chunk_size - chunk_overlap;
    let mut spans = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + chunk_size).min(chars.len());
        spans.push((start, chars[start..end].iter().collect()));
        if end >= chars.len() {
            break;
        }
        start += stride;
    }
    Ok(spans)
}

/// Cut a document into [`Chunk`]s, preserving document order.
pub fn chunk_document(doc: &Document, cfg: ChunkingConfig) -> Result<Vec<Chunk>> {
    let spans = split_with_overlap(&doc.content, cfg.chunk_size, cfg.chunk_overlap)?;
    let total_chunks = spans.len();
    let chunks = spans
        .into_iter()
        .enumerate()
        .map(|(chunk_index, (source_offset, text))| Chunk {
            id: format!("{}:{}", doc.doc_id, chunk_index),
            doc_id: doc.doc_id.clone(),
            length: text.chars().count(),
            text,
            source_offset,
            chunk_index,
            total_chunks,
        })
        .collect();
    Ok(chunks)
}
