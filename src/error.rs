// src/error.rs
//! Typed failures for the generation pipeline.
//!
//! Library seams return these enums; the CLI and filesystem layers wrap them
//! in `anyhow` with context.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures reported by an LLM backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LlmError {
    /// Backend did not answer within the request timeout
    #[error("backend timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Backend could not be reached at all
    #[error("could not connect to backend: {0}")]
    ConnectionFailure(String),

    /// Backend answered with an error status or an unusable body
    #[error("backend error: {0}")]
    BackendError(String),
}

impl LlmError {
    /// Classify a transport error from reqwest.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else if err.is_connect() {
            LlmError::ConnectionFailure(err.to_string())
        } else {
            LlmError::BackendError(err.to_string())
        }
    }
}

/// The model answered, but not with the JSON object we asked for.
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metadata is missing field `{0}`")]
    MissingField(&'static str),
}

/// Failures of the best-effort metadata extraction.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Generation(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Failures of a single cover letter generation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("generation failed: {0}")]
    GenerationFailed(#[source] LlmError),

    #[error("temperature {0} is outside [0, 1]")]
    InvalidTemperature(f32),

    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        PipelineError::GenerationFailed(err)
    }
}
