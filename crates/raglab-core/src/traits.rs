use crate::error::Result;
use crate::types::{ChatMessage, IndexEntry, SearchHit};
use async_trait::async_trait;

#[async_trait]
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()>;
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}
