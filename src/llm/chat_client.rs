// src/llm/chat_client.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::{read_body, CompletionRequest, LlmClient};
use crate::error::LlmError;
use crate::types::response::{ChatMessage, ChatPayload, ChatResponse, ModelsResponse};

const MODELS_ENDPOINT: &str = "/v1/models";
const CHAT_ENDPOINT: &str = "/v1/chat/completions";

/// Client for a hosted chat-completion API with bearer authentication.
pub struct ChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    request_timeout: Duration,
}

impl ChatClient {
    pub fn new(base_url: String, api_key: String, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    fn messages<'a>(request: &'a CompletionRequest) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt.user,
        });
        messages
    }
}

#[async_trait]
impl LlmClient for ChatClient {
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}{}", self.base_url, MODELS_ENDPOINT);
        debug!("Listing models: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.request_timeout))?;

        let body = read_body(response, self.request_timeout).await?;
        let models: ModelsResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::BackendError(format!("unexpected model listing: {}", e)))?;

        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, CHAT_ENDPOINT);

        let payload = ChatPayload {
            model: &request.model,
            messages: Self::messages(request),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        info!("Sending chat completion request to {} ({})", url, request.model);

        let response = self
            .client
            .post(&url)
            .timeout(request.timeout)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, request.timeout))?;

        let body = read_body(response, request.timeout).await?;
        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::BackendError(format!("unexpected chat response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::BackendError("chat response contained no message".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Prompt;
    use crate::test_support::serve_once;

    fn request(prompt: Prompt) -> CompletionRequest {
        CompletionRequest {
            prompt,
            model: "gpt-4o".into(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn system_role_is_sent_separately() {
        let req = request(Prompt::new("You write letters.", "Job: Rust dev"));
        let payload = ChatPayload {
            model: &req.model,
            messages: ChatClient::messages(&req),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You write letters.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 1000);
    }

    #[test]
    fn user_only_prompt_has_single_message() {
        let req = request(Prompt::user_only("Extract metadata"));
        let messages = ChatClient::messages(&req);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[tokio::test]
    async fn unreachable_backend_is_connection_failure() {
        let client = ChatClient::new(
            "http://127.0.0.1:1".into(),
            "sk-test".into(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.list_models().await.unwrap_err();
        assert!(matches!(err, LlmError::ConnectionFailure(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn generate_returns_first_choice() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"Dear Hiring Manager,"}}]}"#,
        )
        .await;
        let client = ChatClient::new(base, "sk-test".into(), Duration::from_secs(5)).unwrap();

        let text = client
            .generate(&request(Prompt::new("You write letters.", "Job: Rust dev")))
            .await
            .unwrap();
        assert_eq!(text, "Dear Hiring Manager,");

        let raw_request = server.await.unwrap();
        assert!(raw_request.starts_with("POST /v1/chat/completions"));
        assert!(raw_request.to_lowercase().contains("authorization: bearer sk-test"));
        assert!(raw_request.contains(r#""role":"system""#));
    }

    #[tokio::test]
    async fn error_status_carries_api_message() {
        let (base, _server) = serve_once(
            "401 Unauthorized",
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        )
        .await;
        let client = ChatClient::new(base, "sk-bad".into(), Duration::from_secs(5)).unwrap();

        let err = client
            .generate(&request(Prompt::user_only("hi")))
            .await
            .unwrap_err();
        match err {
            LlmError::BackendError(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("Incorrect API key provided"));
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_backend_error() {
        let (base, _server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
        let client = ChatClient::new(base, "sk-test".into(), Duration::from_secs(5)).unwrap();

        let err = client
            .generate(&request(Prompt::user_only("hi")))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::BackendError(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn lists_model_ids() {
        let (base, server) =
            serve_once("200 OK", r#"{"object":"list","data":[{"id":"gpt-4o"},{"id":"gpt-4o-mini"}]}"#)
                .await;
        let client = ChatClient::new(base, "sk-test".into(), Duration::from_secs(5)).unwrap();

        assert_eq!(client.list_models().await.unwrap(), vec!["gpt-4o", "gpt-4o-mini"]);
        assert!(server.await.unwrap().starts_with("GET /v1/models"));
    }
}
