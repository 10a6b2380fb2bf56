//! Client for a Chroma-style vector index service.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use raglab_core::error::{Error, Result};
use raglab_core::traits::VectorIndex;
use raglab_core::types::{IndexEntry, SearchHit};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote vector index bound to one named collection.
///
/// The collection is created on connect if it does not exist. The service
/// reports distances (lower is closer); they are converted to scores as
/// `1.0 - distance` so higher is always more similar. Result ordering is
/// the service's own and is passed through unchanged.
#[derive(Debug)]
pub struct RemoteVectorIndex {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    documents: Vec<Vec<String>>,
    distances: Vec<Vec<f32>>,
}

impl RemoteVectorIndex {
    /// Get or create `collection` on the service at `base_url`.
    pub async fn connect(base_url: &str, collection: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Service(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let payload = serde_json::json!({
            "name": collection,
            "get_or_create": true,
        });
        let response = client
            .post(format!("{base_url}/api/v1/collections"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Service(format!("vector index connect failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "vector index returned {status} on connect: {body}"
            )));
        }
        let parsed: CollectionResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("invalid collection response: {e}")))?;
        tracing::debug!(collection, id = %parsed.id, "connected to vector index");
        Ok(Self { client, base_url, collection_id: parsed.id })
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    async fn post(&self, endpoint: &str, payload: &serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!(
                "{}/api/v1/collections/{}/{endpoint}",
                self.base_url, self.collection_id
            ))
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Service(format!("vector index request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "vector index returned {status} on {endpoint}: {body}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl VectorIndex for RemoteVectorIndex {
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut ids = Vec::with_capacity(entries.len());
        let mut embeddings = Vec::with_capacity(entries.len());
        let mut documents = Vec::with_capacity(entries.len());
        let mut metadatas = Vec::with_capacity(entries.len());
        for entry in entries {
            ids.push(entry.id);
            embeddings.push(entry.vector);
            documents.push(entry.text);
            metadatas.push(entry.metadata);
        }
        let payload = serde_json::json!({
            "ids": ids,
            "embeddings": embeddings,
            "documents": documents,
            "metadatas": metadatas,
        });
        self.post("upsert", &payload).await?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let payload = serde_json::json!({
            "query_embeddings": [vector],
            "n_results": k,
            "include": ["documents", "distances"],
        });
        let response = self.post("query", &payload).await?;
        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("invalid query response: {e}")))?;
        let ids = parsed.ids.into_iter().next().unwrap_or_default();
        let documents = parsed.documents.into_iter().next().unwrap_or_default();
        let distances = parsed.distances.into_iter().next().unwrap_or_default();
        if ids.len() != documents.len() || ids.len() != distances.len() {
            return Err(Error::Service(format!(
                "vector index result shape mismatch: {} ids, {} documents, {} distances",
                ids.len(),
                documents.len(),
                distances.len()
            )));
        }
        let hits = ids
            .into_iter()
            .zip(documents)
            .zip(distances)
            .map(|((id, text), distance)| SearchHit { id, text, score: 1.0 - distance })
            .collect();
        Ok(hits)
    }
}
