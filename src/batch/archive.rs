// src/batch/archive.rs
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::core::FsOps;
use crate::types::JobMetadata;
use crate::utils::{archive_file_name, get_file_extension};

/// Moves processed postings into the archive ("bin") directory under
/// `{company}-{position}-{YYYYMMDD}.{ext}`, never overwriting an earlier archive.
pub struct Archiver {
    bin_dir: PathBuf,
}

impl Archiver {
    pub fn new(bin_dir: PathBuf) -> Self {
        Self { bin_dir }
    }

    /// Destination the source would be moved to right now.
    pub fn destination_for(&self, source: &Path, metadata: &JobMetadata, now: DateTime<Local>) -> PathBuf {
        let extension = get_file_extension(source).unwrap_or_else(|| "txt".to_string());
        let target = self.bin_dir.join(archive_file_name(metadata, &extension, now));
        FsOps::unique_destination(&target, now)
    }

    pub async fn archive(
        &self,
        source: &Path,
        metadata: &JobMetadata,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let destination = self.destination_for(source, metadata, now);
        FsOps::move_file(source, &destination).await?;
        Ok(destination)
    }
}
