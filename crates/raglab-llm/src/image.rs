//! Image generation client.

use serde::Deserialize;
use std::time::Duration;

use raglab_core::error::{Error, Result};

pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct ImageClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

impl ImageClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, model, crate::chat::DEFAULT_BASE_URL)
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

    /// Generate one image and return its URL.
    pub async fn generate(&self, prompt: &str, size: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "size": size,
        });
        tracing::debug!(model = %self.model, size, "requesting image generation");
        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Service(format!("image request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "image service returned {status}: {body}"
            )));
        }
        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("invalid image response: {e}")))?;
        parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or_else(|| Error::Service("image response carried no URL".to_string()))
    }
}
