// src/letter/pipeline.rs
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::cv::CvDocument;
use super::prompts::{cover_letter_prompt, metadata_prompt};
use crate::error::{MetadataError, ParseFailure, PipelineError};
use crate::llm::{CompletionRequest, LlmClient};
use crate::types::job::UNKNOWN;
use crate::types::{GenerationRequest, JobMetadata};

pub const METADATA_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_tokens: u32,
    pub metadata_max_tokens: u32,
    pub generation_timeout: Duration,
    pub metadata_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            metadata_max_tokens: 200,
            generation_timeout: Duration::from_secs(300),
            metadata_timeout: Duration::from_secs(30),
        }
    }
}

/// Builds prompts from the CV and a posting and runs them through the backend.
pub struct CoverLetterPipeline {
    client: Arc<dyn LlmClient>,
    cv: CvDocument,
    settings: PipelineSettings,
}

impl CoverLetterPipeline {
    pub fn new(client: Arc<dyn LlmClient>, cv: CvDocument, settings: PipelineSettings) -> Self {
        if cv.is_empty() {
            warn!("CV is empty; letters will not reference the candidate's background");
        }

        Self {
            client,
            cv,
            settings,
        }
    }

    pub fn cv(&self) -> &CvDocument {
        &self.cv
    }

    pub fn client(&self) -> &dyn LlmClient {
        self.client.as_ref()
    }

    /// Generate a cover letter for one posting.
    pub async fn generate_cover_letter(
        &self,
        job_posting: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, PipelineError> {
        let request =
            GenerationRequest::new(job_posting, self.cv.cleaned_text(), model, temperature)?;
        self.generate(&request).await
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, PipelineError> {
        let completion = CompletionRequest {
            prompt: cover_letter_prompt(&request.cv_text, &request.job_posting_text),
            model: request.model.clone(),
            temperature: request.temperature,
            max_tokens: self.settings.max_tokens,
            timeout: self.settings.generation_timeout,
        };

        let letter = self.client.generate(&completion).await?;
        info!("Generated cover letter ({} chars)", letter.chars().count());
        Ok(letter)
    }

    /// Ask the backend for company and position.
    pub async fn try_extract_job_metadata(
        &self,
        job_posting: &str,
        model: &str,
    ) -> Result<JobMetadata, MetadataError> {
        let completion = CompletionRequest {
            prompt: metadata_prompt(job_posting),
            model: model.to_string(),
            temperature: METADATA_TEMPERATURE,
            max_tokens: self.settings.metadata_max_tokens,
            timeout: self.settings.metadata_timeout,
        };

        let raw = self.client.generate(&completion).await?;
        Ok(parse_job_metadata(&raw)?)
    }

    /// Best-effort metadata: any failure becomes `Unknown/Unknown`.
    pub async fn extract_job_metadata(&self, job_posting: &str, model: &str) -> JobMetadata {
        match self.try_extract_job_metadata(job_posting, model).await {
            Ok(metadata) => {
                info!(
                    "Extracted metadata: {} / {}",
                    metadata.company, metadata.position
                );
                metadata
            }
            Err(e) => {
                warn!("Metadata extraction failed, using defaults: {}", e);
                JobMetadata::default()
            }
        }
    }
}

#[derive(Deserialize)]
struct RawMetadata {
    company: Option<String>,
    position: Option<String>,
}

/// Parse the model's metadata answer, tolerating markdown code fences.
pub fn parse_job_metadata(raw: &str) -> Result<JobMetadata, ParseFailure> {
    let parsed: RawMetadata = serde_json::from_str(strip_code_fences(raw))?;

    let company = parsed.company.ok_or(ParseFailure::MissingField("company"))?;
    let position = parsed.position.ok_or(ParseFailure::MissingField("position"))?;

    Ok(JobMetadata::new(or_unknown(company), or_unknown(position)))
}

fn or_unknown(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let metadata = parse_job_metadata(r#"{"company": "Acme Corp", "position": "Backend Engineer"}"#).unwrap();
        assert_eq!(metadata, JobMetadata::new("Acme Corp", "Backend Engineer"));
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = "```json\n{\"company\": \"Initech\", \"position\": \"SRE\"}\n```";
        assert_eq!(
            parse_job_metadata(fenced).unwrap(),
            JobMetadata::new("Initech", "SRE")
        );

        let bare_fence = "```\n{\"company\": \"Initech\", \"position\": \"SRE\"}\n```\n";
        assert!(parse_job_metadata(bare_fence).is_ok());

        let one_line = "```json {\"company\": \"A\", \"position\": \"B\"}```";
        assert_eq!(parse_job_metadata(one_line).unwrap(), JobMetadata::new("A", "B"));
    }

    #[test]
    fn missing_key_is_a_parse_failure() {
        let err = parse_job_metadata(r#"{"company": "Acme"}"#).unwrap_err();
        assert!(matches!(err, ParseFailure::MissingField("position")));
    }

    #[test]
    fn prose_is_a_parse_failure() {
        let err = parse_job_metadata("The company is Acme and the role is SRE.").unwrap_err();
        assert!(matches!(err, ParseFailure::Json(_)));
    }

    #[test]
    fn blank_values_become_unknown() {
        let metadata = parse_job_metadata(r#"{"company": "  ", "position": "Data Engineer"}"#).unwrap();
        assert_eq!(metadata.company, "Unknown");
        assert_eq!(metadata.position, "Data Engineer");
    }
}
