//! Domain types shared by the pipeline crates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ChunkId = String;
pub type Meta = HashMap<String, String>;

/// Raw text loaded from disk, tagged with its origin.
///
/// Immutable once loaded; everything downstream works on borrowed views
/// or on the chunks cut from it.
#[derive(Debug, Clone)]
pub struct Document {
    pub doc_id: String,
    pub source: String,
    pub content: String,
}

/// A bounded window of a source document prepared for embedding.
///
/// - `id`: globally unique chunk identifier (`"{doc_id}:{chunk_index}"`)
/// - `source_offset`/`length`: position within the parent document, in
///   characters
/// - `chunk_index`/`total_chunks`: position within the chunk sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub text: String,
    pub source_offset: usize,
    pub length: usize,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One record stored in a vector index: created at ingestion, read-only
/// afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: ChunkId,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: Meta,
}

/// A ranked similarity result. `score` is index-specific but higher is
/// always more similar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub text: String,
    pub score: f32,
}

/// Conversation roles understood by the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One turn of a conversation sent to the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}
