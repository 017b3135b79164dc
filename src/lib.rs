//! Job posting scraper and cover letter generator.
//!
//! Postings come from scraped pages ([`scraping`]) or text files; letters are
//! written by a language model ([`llm`]) through the [`letter`] pipeline, one
//! posting at a time or in bulk with [`batch`].

pub mod batch;
pub mod cli;
pub mod config;
pub mod core;
pub mod environment;
pub mod error;
pub mod letter;
pub mod llm;
pub mod scraping;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use batch::{BatchOptions, BatchOrchestrator, BatchReport};
pub use config::{AppConfig, BackendKind, ConfigLayer};
pub use error::{LlmError, MetadataError, ParseFailure, PipelineError};
pub use letter::{CoverLetterPipeline, CvDocument, PipelineSettings};
pub use llm::{LlmClient, Prompt};
pub use scraping::{ContentExtractor, JobScraper};
pub use types::{ExtractionResult, JobMetadata, JobPosting};
