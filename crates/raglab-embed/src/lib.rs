//! Embedding providers.
//!
//! `OpenAiEmbedder` calls a remote OpenAI-compatible `/embeddings` endpoint;
//! `FakeEmbedder` produces deterministic hashed vectors for offline runs and
//! tests. `get_default_embedder` picks one based on the environment.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use raglab_core::config::Config;
use raglab_core::error::{Error, Result};
use raglab_core::traits::Embedder;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Service(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn fetch(&self, texts: &[String]) -> Result<EmbeddingResponse> {
        let payload = serde_json::json!({
            "input": texts,
            "model": self.model,
            "encoding_format": "float",
        });
        tracing::debug!(model = %self.model, inputs = texts.len(), "requesting embeddings");
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Service(format!("embedding request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "embedding service returned {status}: {body}"
            )));
        }
        response
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| Error::Service(format!("invalid embedding response: {e}")))
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn dim(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        Ok(vectors.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let response = self.fetch(texts).await?;
        if response.data.len() != texts.len() {
            return Err(Error::Service(format!(
                "embedding count mismatch: sent {}, got {}",
                texts.len(),
                response.data.len()
            )));
        }
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Deterministic token-hash embedder for offline runs and tests.
/// Vectors are L2-normalized and stable for identical input.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }
}

/// Pick an embedder: `APP_USE_FAKE_EMBEDDINGS=1` selects the fake one,
/// otherwise the remote client is built from config + `OPENAI_API_KEY`.
pub fn get_default_embedder(config: &Config) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        println!("🧪 Using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(256)));
    }
    let api_key = Config::api_key()?;
    let model: String = config
        .get("embedding.model")
        .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string());
    let base_url: String = config
        .get("embedding.base_url")
        .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    Ok(Box::new(OpenAiEmbedder::with_base_url(api_key, model, base_url)?))
}
