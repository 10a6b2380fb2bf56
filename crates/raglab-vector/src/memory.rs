//! In-process vector index over cosine similarity.

use async_trait::async_trait;
use std::sync::RwLock;

use raglab_core::error::{Error, Result};
use raglab_core::traits::VectorIndex;
use raglab_core::types::{IndexEntry, SearchHit};

/// Cosine-similarity index held entirely in memory.
///
/// Ranking is descending by score; equal scores keep insertion order
/// (stable sort), so re-running the same query is reproducible.
#[derive(Default)]
pub struct MemoryVectorIndex {
    entries: RwLock<Vec<IndexEntry>>,
}

impl MemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        let mut store = self
            .entries
            .write()
            .map_err(|_| Error::Service("memory index lock poisoned".to_string()))?;
        for entry in entries {
            match store.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => store.push(entry),
            }
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let store = self
            .entries
            .read()
            .map_err(|_| Error::Service("memory index lock poisoned".to_string()))?;
        for entry in store.iter() {
            if entry.vector.len() != vector.len() {
                return Err(Error::InvalidConfig(format!(
                    "query dimension {} does not match indexed dimension {}",
                    vector.len(),
                    entry.vector.len()
                )));
            }
        }
        let mut hits: Vec<SearchHit> = store
            .iter()
            .map(|entry| SearchHit {
                id: entry.id.clone(),
                text: entry.text.clone(),
                score: cosine(&entry.vector, vector),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}
