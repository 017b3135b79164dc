// src/core/fs_ops.rs
//! File system operations shared by the scraper, the single run and the batch runner

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::utils::with_stem_suffix;

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write file, creating parent directories first
    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        debug!("Written file: {}", path.display());
        Ok(())
    }

    /// Move a file, falling back to copy + remove across file systems
    pub async fn move_file(src: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        if fs::rename(src, dest).await.is_err() {
            fs::copy(src, dest).await.with_context(|| {
                format!("Failed to copy {} to {}", src.display(), dest.display())
            })?;
            fs::remove_file(src)
                .await
                .with_context(|| format!("Failed to remove {}", src.display()))?;
        }

        info!("Moved {} to {}", src.display(), dest.display());
        Ok(())
    }

    /// List files matching a glob pattern inside `dir`, sorted by path.
    ///
    /// A missing directory or an empty match yields an empty list.
    pub fn list_matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let full_pattern = dir.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        let mut files = Vec::new();
        for entry in glob::glob(&pattern_str)
            .with_context(|| format!("Invalid input pattern: {}", pattern))?
        {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Pick a destination that does not exist yet.
    ///
    /// Tries `target`, then `target` with a `HHMMSS` suffix, then the
    /// suffixed name with an increasing counter.
    pub fn unique_destination(target: &Path, now: DateTime<Local>) -> PathBuf {
        if !target.exists() {
            return target.to_path_buf();
        }

        let time_suffix = now.format("%H%M%S").to_string();
        let timed = with_stem_suffix(target, &time_suffix);
        if !timed.exists() {
            return timed;
        }

        let mut counter = 2u32;
        loop {
            let candidate = with_stem_suffix(&timed, &counter.to_string());
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}
