// src/batch/orchestrator.rs
use anyhow::{Context, Result};
use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::archive::Archiver;
use super::types::{BatchItemOutcome, BatchReport, ItemState};
use crate::config::AppConfig;
use crate::core::FsOps;
use crate::letter::CoverLetterPipeline;
use crate::types::{JobMetadata, JobPosting};
use crate::utils::letter_path_for;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub pattern: String,
    pub output_dir: PathBuf,
    pub model: String,
    pub temperature: f32,
    /// Archive directory; `None` disables move-to-bin.
    pub bin_dir: Option<PathBuf>,
}

impl BatchOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            input_dir: config.input_dir.clone(),
            pattern: config.input_pattern.clone(),
            output_dir: config.output_dir.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            bin_dir: config.move_to_bin.then(|| config.bin_dir.clone()),
        }
    }
}

/// Runs the cover letter pipeline over every posting in the input directory.
///
/// Items are processed one at a time. A failing item is recorded and the run
/// moves on; archival happens after the full pass and only for items that
/// succeeded.
pub struct BatchOrchestrator {
    pipeline: CoverLetterPipeline,
    options: BatchOptions,
}

impl BatchOrchestrator {
    pub fn new(pipeline: CoverLetterPipeline, options: BatchOptions) -> Self {
        Self { pipeline, options }
    }

    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        FsOps::list_matching(&self.options.input_dir, &self.options.pattern)
    }

    pub async fn run(&self) -> Result<BatchReport> {
        let sources = self.discover()?;
        let mut report = BatchReport {
            outcomes: Vec::with_capacity(sources.len()),
            archival_requested: self.options.bin_dir.is_some(),
        };

        if sources.is_empty() {
            warn!(
                "No files matching '{}' in {}",
                self.options.pattern,
                self.options.input_dir.display()
            );
            return Ok(report);
        }

        info!("Found {} job posting(s) to process", sources.len());

        let mut written = HashSet::new();
        for (i, source) in sources.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, sources.len(), source.display());
            let outcome = self.process_item(source, &mut written).await;
            report.outcomes.push(outcome);
        }

        if let Some(bin_dir) = &self.options.bin_dir {
            self.archive_successes(bin_dir, &mut report.outcomes).await;
        }

        info!("Batch complete: {}", report.summary());
        Ok(report)
    }

    async fn process_item(
        &self,
        source: &Path,
        written: &mut HashSet<PathBuf>,
    ) -> BatchItemOutcome {
        let mut outcome = BatchItemOutcome::pending(source);

        match self.run_item(source, &mut outcome, written).await {
            Ok(output_path) => {
                info!("✅ {} -> {}", source.display(), output_path.display());
                outcome.succeed(output_path);
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!("❌ {} failed while {}: {}", source.display(), outcome.state, message);
                outcome.fail(message);
            }
        }

        outcome
    }

    async fn run_item(
        &self,
        source: &Path,
        outcome: &mut BatchItemOutcome,
        written: &mut HashSet<PathBuf>,
    ) -> Result<PathBuf> {
        transition(outcome, ItemState::Reading);
        let posting = JobPosting::new(FsOps::read_file_safe(source).await?);
        if posting.is_blank() {
            anyhow::bail!("Job posting is empty: {}", source.display());
        }

        if self.options.bin_dir.is_some() {
            outcome.metadata = Some(
                self.pipeline
                    .extract_job_metadata(posting.text(), &self.options.model)
                    .await,
            );
        }

        transition(outcome, ItemState::Generating);
        let letter = self
            .pipeline
            .generate_cover_letter(posting.text(), &self.options.model, self.options.temperature)
            .await
            .with_context(|| format!("Failed to generate letter for {}", source.display()))?;

        transition(outcome, ItemState::Writing);
        let mut output_path = letter_path_for(source, &self.options.output_dir);
        // Letters from earlier runs may be replaced, letters from this run may not.
        if written.contains(&output_path) {
            let unique = FsOps::unique_destination(&output_path, Local::now());
            warn!(
                "{} was already written in this run, saving as {}",
                output_path.display(),
                unique.display()
            );
            output_path = unique;
        }
        FsOps::write_file_safe(&output_path, &letter).await?;
        written.insert(output_path.clone());

        Ok(output_path)
    }

    async fn archive_successes(&self, bin_dir: &Path, outcomes: &mut [BatchItemOutcome]) {
        let archiver = Archiver::new(bin_dir.to_path_buf());

        for outcome in outcomes.iter_mut().filter(|o| o.succeeded) {
            transition(outcome, ItemState::Archiving);
            let metadata = outcome.metadata.clone().unwrap_or_else(JobMetadata::default);

            match archiver
                .archive(&outcome.source_path, &metadata, Local::now())
                .await
            {
                Ok(destination) => {
                    info!(
                        "Archived {} as {}",
                        outcome.source_path.display(),
                        destination.display()
                    );
                    outcome.archive(destination);
                }
                Err(e) => {
                    error!(
                        "Could not archive {}: {:#}",
                        outcome.source_path.display(),
                        e
                    );
                    outcome.state = ItemState::Succeeded;
                }
            }
        }
    }
}

fn transition(outcome: &mut BatchItemOutcome, next: ItemState) {
    debug!(
        "{}: {} -> {}",
        outcome.source_path.display(),
        outcome.state,
        next
    );
    outcome.state = next;
}
