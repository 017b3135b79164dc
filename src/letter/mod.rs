// src/letter/mod.rs
//! Cover letter generation: CV cleaning, prompt construction and the pipeline.

pub mod cv;
pub mod pipeline;
pub mod prompts;

pub use cv::{clean_cv_markup, CvDocument};
pub use pipeline::{parse_job_metadata, CoverLetterPipeline, PipelineSettings};
