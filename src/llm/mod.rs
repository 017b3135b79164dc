// src/llm/mod.rs
//! Text-generation backends.
//!
//! The pipeline only sees [`LlmClient`]: one model listing query and one
//! blocking completion call. Nothing here streams or retries.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{AppConfig, BackendKind};
use crate::error::LlmError;

pub mod chat_client;
pub mod local_client;

pub use chat_client::ChatClient;
pub use local_client::LocalClient;

/// A prompt with an optional system role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }

    pub fn user_only(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    /// Single prompt string for backends without role separation.
    pub fn flatten(&self) -> String {
        match &self.system {
            Some(system) => format!("{}\n\n{}", system, self.user),
            None => self.user.clone(),
        }
    }
}

/// One completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: Prompt,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Names of the models the backend can serve.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;

    /// Run a single completion and return the generated text.
    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Build the configured backend client.
pub fn client_from_config(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match config.backend {
        BackendKind::Local => Arc::new(LocalClient::new(
            config.endpoint.clone(),
            config.request_timeout,
        )?),
        BackendKind::Openai => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("OPENAI_API_KEY must be set for the openai backend")
            })?;
            Arc::new(ChatClient::new(
                config.endpoint.clone(),
                api_key,
                config.request_timeout,
            )?)
        }
    };
    Ok(client)
}

/// Connectivity check: list models and warn when `model` is not among them.
///
/// Only an unreachable or failing backend is an error. An unknown model name
/// is left for the backend to reject at generation time.
pub async fn verify_backend(client: &dyn LlmClient, model: &str) -> Result<Vec<String>, LlmError> {
    let models = client.list_models().await?;
    info!("Backend reachable, {} model(s) available", models.len());

    if !model_is_listed(&models, model) {
        warn!(
            "Model '{}' not found in backend listing; available: {}",
            model,
            models.join(", ")
        );
    }

    Ok(models)
}

/// Local servers tag models (`llama3.1:latest`); accept the untagged name too.
pub fn model_is_listed(models: &[String], model: &str) -> bool {
    models.iter().any(|listed| {
        listed == model
            || listed
                .split_once(':')
                .is_some_and(|(name, _)| name == model)
    })
}

/// Shared handling of a backend response: status check, error envelope, body text.
pub(crate) async fn read_body(
    response: reqwest::Response,
    timeout: Duration,
) -> Result<String, LlmError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LlmError::from_reqwest(e, timeout))?;

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<crate::types::response::ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message().to_string())
        .unwrap_or(body);
    Err(LlmError::BackendError(format!("HTTP {}: {}", status, message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_joins_system_and_user() {
        let prompt = Prompt::new("Be brief.", "Write a letter.");
        assert_eq!(prompt.flatten(), "Be brief.\n\nWrite a letter.");
        assert_eq!(Prompt::user_only("Only user").flatten(), "Only user");
    }

    #[test]
    fn model_listing_accepts_tagged_names() {
        let models = vec!["llama3.1:latest".to_string(), "gpt-4o".to_string()];
        assert!(model_is_listed(&models, "llama3.1"));
        assert!(model_is_listed(&models, "llama3.1:latest"));
        assert!(model_is_listed(&models, "gpt-4o"));
        assert!(!model_is_listed(&models, "mistral"));
    }

    #[test]
    fn hosted_backend_requires_api_key() {
        let config = AppConfig::from_layer(crate::config::ConfigLayer {
            backend: Some(BackendKind::Openai),
            ..Default::default()
        });
        assert!(client_from_config(&config).is_err());
    }
}
