// src/utils.rs
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::types::JobMetadata;

const LETTER_PREFIX: &str = "cover_letter_";
const LETTER_EXTENSION: &str = "txt";

/// Normalize a company or position name for use in a file name.
///
/// Lowercases, turns spaces into hyphens, drops anything that is not
/// alphanumeric or a hyphen, collapses hyphen runs and trims hyphens at both
/// ends. An empty result becomes `unknown`.
pub fn sanitize_component(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();

    let collapsed = kept
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if collapsed.is_empty() {
        "unknown".to_string()
    } else {
        collapsed
    }
}

/// Strip every line, drop the empty ones and rejoin with newlines.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Letter path for a batch source: `job_acme.txt` becomes `cover_letter_job_acme.txt`.
pub fn letter_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("posting");

    output_dir.join(format!("{}{}.{}", LETTER_PREFIX, stem, LETTER_EXTENSION))
}

/// Letter path for a single interactive run.
pub fn timestamped_letter_path(output_dir: &Path, now: DateTime<Local>) -> PathBuf {
    output_dir.join(format!(
        "{}{}.{}",
        LETTER_PREFIX,
        now.format("%Y%m%d_%H%M%S"),
        LETTER_EXTENSION
    ))
}

/// Canonical archive name: `{company}-{position}-{YYYYMMDD}.{ext}`.
pub fn archive_file_name(metadata: &JobMetadata, extension: &str, now: DateTime<Local>) -> String {
    format!(
        "{}-{}-{}.{}",
        sanitize_component(&metadata.company),
        sanitize_component(&metadata.position),
        now.format("%Y%m%d"),
        extension
    )
}

/// Insert a suffix between the file stem and its extension.
pub fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");

    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext),
        None => format!("{}-{}", stem, suffix),
    };

    path.with_file_name(name)
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
