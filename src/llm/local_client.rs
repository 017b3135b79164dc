// src/llm/local_client.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::{read_body, CompletionRequest, LlmClient};
use crate::error::LlmError;
use crate::types::response::{CompletionOptions, CompletionPayload, CompletionResponse, TagsResponse};

const TAGS_ENDPOINT: &str = "/api/tags";
const GENERATE_ENDPOINT: &str = "/api/generate";

/// Client for a local completion server with model listing.
pub struct LocalClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl LocalClient {
    pub fn new(base_url: String, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }
}

#[async_trait]
impl LlmClient for LocalClient {
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}{}", self.base_url, TAGS_ENDPOINT);
        debug!("Listing models: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.request_timeout))?;

        let body = read_body(response, self.request_timeout).await?;
        let tags: TagsResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::BackendError(format!("unexpected model listing: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, GENERATE_ENDPOINT);
        let prompt = request.prompt.flatten();

        let payload = CompletionPayload {
            model: &request.model,
            prompt: &prompt,
            stream: false,
            options: CompletionOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        info!(
            "Calling local model {} (timeout {}s)",
            request.model,
            request.timeout.as_secs()
        );

        let response = self
            .client
            .post(&url)
            .timeout(request.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, request.timeout))?;

        let body = read_body(response, request.timeout).await?;
        let completion: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::BackendError(format!("unexpected completion body: {}", e)))?;

        if completion.response.trim().is_empty() {
            return Err(LlmError::BackendError("model returned an empty completion".into()));
        }

        Ok(completion.response)
    }
}
