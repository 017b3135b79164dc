// src/types/job.rs
//! Job posting data structures shared by the scraper, pipeline and batch runner

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const UNKNOWN: &str = "Unknown";

// ===== Job Posting =====

/// Free-text description of an open role, the primary generation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    raw_text: String,
}

impl JobPosting {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.raw_text
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

// ===== Scrape Result =====

/// Outcome of one scrape attempt. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub url: String,
    pub content: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn succeeded(url: &str, content: String) -> Self {
        Self {
            url: url.to_string(),
            content: Some(content),
            success: true,
            error: None,
        }
    }

    pub fn failed(url: &str, error: impl ToString) -> Self {
        Self {
            url: url.to_string(),
            content: None,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

// ===== Generation Request =====

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub job_posting_text: String,
    pub cv_text: String,
    pub model: String,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(
        job_posting_text: impl Into<String>,
        cv_text: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Result<Self, PipelineError> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(PipelineError::InvalidTemperature(temperature));
        }

        Ok(Self {
            job_posting_text: job_posting_text.into(),
            cv_text: cv_text.into(),
            model: model.into(),
            temperature,
        })
    }
}

// ===== Job Metadata =====

/// Company and position pulled out of a posting, used for archive names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub company: String,
    pub position: String,
}

impl Default for JobMetadata {
    fn default() -> Self {
        Self {
            company: UNKNOWN.to_string(),
            position: UNKNOWN.to_string(),
        }
    }
}

impl JobMetadata {
    pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            position: position.into(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.company == UNKNOWN && self.position == UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_outside_unit_range_is_rejected() {
        assert!(GenerationRequest::new("job", "cv", "m", 0.0).is_ok());
        assert!(GenerationRequest::new("job", "cv", "m", 1.0).is_ok());
        assert!(matches!(
            GenerationRequest::new("job", "cv", "m", 1.5),
            Err(PipelineError::InvalidTemperature(_))
        ));
        assert!(GenerationRequest::new("job", "cv", "m", -0.1).is_err());
    }

    #[test]
    fn default_metadata_is_unknown() {
        let metadata = JobMetadata::default();
        assert_eq!(metadata.company, "Unknown");
        assert_eq!(metadata.position, "Unknown");
        assert!(metadata.is_unknown());
    }

    #[test]
    fn failed_extraction_has_no_content() {
        let result = ExtractionResult::failed("https://example.com", "HTTP error: 404");
        assert!(!result.success);
        assert!(result.content.is_none());
        assert_eq!(result.error.as_deref(), Some("HTTP error: 404"));
    }
}
