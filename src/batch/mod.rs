// src/batch/mod.rs
pub mod archive;
pub mod orchestrator;
pub mod types;

pub use archive::Archiver;
pub use orchestrator::{BatchOptions, BatchOrchestrator};
pub use types::{BatchItemOutcome, BatchReport, ItemState};
