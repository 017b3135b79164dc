// src/batch/types.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::JobMetadata;

/// Lifecycle of one batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemState {
    Pending,
    Reading,
    Generating,
    Writing,
    Succeeded,
    Failed,
    Archiving,
    Archived,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemState::Pending => "pending",
            ItemState::Reading => "reading",
            ItemState::Generating => "generating",
            ItemState::Writing => "writing",
            ItemState::Succeeded => "succeeded",
            ItemState::Failed => "failed",
            ItemState::Archiving => "archiving",
            ItemState::Archived => "archived",
        };
        f.write_str(name)
    }
}

/// Result of processing one input file.
#[derive(Debug, Clone)]
pub struct BatchItemOutcome {
    pub source_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub metadata: Option<JobMetadata>,
    pub succeeded: bool,
    pub error_message: Option<String>,
    pub archived_path: Option<PathBuf>,
    pub state: ItemState,
}

impl BatchItemOutcome {
    pub fn pending(source_path: &Path) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            output_path: None,
            metadata: None,
            succeeded: false,
            error_message: None,
            archived_path: None,
            state: ItemState::Pending,
        }
    }

    pub fn succeed(&mut self, output_path: PathBuf) {
        self.output_path = Some(output_path);
        self.succeeded = true;
        self.state = ItemState::Succeeded;
    }

    pub fn fail(&mut self, message: String) {
        self.succeeded = false;
        self.error_message = Some(message);
        self.state = ItemState::Failed;
    }

    pub fn archive(&mut self, archived_path: PathBuf) {
        self.archived_path = Some(archived_path);
        self.state = ItemState::Archived;
    }
}

/// Everything one batch run produced.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchItemOutcome>,
    pub archival_requested: bool,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failures(&self) -> usize {
        self.total() - self.successes()
    }

    /// Archived items, or `None` when archival was not requested.
    pub fn archived(&self) -> Option<usize> {
        self.archival_requested.then(|| {
            self.outcomes
                .iter()
                .filter(|o| o.archived_path.is_some())
                .count()
        })
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &BatchItemOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} item(s): {} succeeded, {} failed",
            self.total(),
            self.successes(),
            self.failures()
        );
        if let Some(archived) = self.archived() {
            line.push_str(&format!(", {} archived", archived));
        }
        line
    }

    /// Write one CSV row per outcome.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create report: {}", path.display()))?;

        for outcome in &self.outcomes {
            writer.serialize(ReportRow::from(outcome))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ReportRow {
    source: String,
    state: String,
    output: String,
    company: String,
    position: String,
    archived_as: String,
    error: String,
}

impl From<&BatchItemOutcome> for ReportRow {
    fn from(outcome: &BatchItemOutcome) -> Self {
        let display = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        Self {
            source: outcome.source_path.display().to_string(),
            state: outcome.state.to_string(),
            output: display(&outcome.output_path),
            company: outcome
                .metadata
                .as_ref()
                .map(|m| m.company.clone())
                .unwrap_or_default(),
            position: outcome
                .metadata
                .as_ref()
                .map(|m| m.position.clone())
                .unwrap_or_default(),
            archived_as: display(&outcome.archived_path),
            error: outcome.error_message.clone().unwrap_or_default(),
        }
    }
}
