#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use cover_letter::llm::{CompletionRequest, LlmClient};
use cover_letter::LlmError;

type Responder = dyn Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync;

/// LLM stand-in that answers through a closure and records every request.
pub struct MockLlm {
    responder: Box<Responder>,
    models: Vec<String>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            models: vec!["mock-model".to_string()],
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(self.models.clone())
    }

    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

/// Metadata prompts carry no system role; letter prompts do.
pub fn is_metadata_request(request: &CompletionRequest) -> bool {
    request.prompt.system.is_none()
}

/// First line of the CV section of a letter prompt.
pub fn cv_name(request: &CompletionRequest) -> Option<String> {
    request
        .prompt
        .user
        .split("CV:\n")
        .nth(1)
        .and_then(|rest| rest.lines().next())
        .map(str::to_string)
}

pub const RESUME: &str = r"\usepackage{geometry}
\geometry{margin=1in}
% contact block
Jane Doe
jane.doe@example.com | +1 555 0100
Backend Engineer, 6 years of Rust and Go
";
