pub mod job;
pub mod response;

pub use job::{ExtractionResult, GenerationRequest, JobMetadata, JobPosting};
