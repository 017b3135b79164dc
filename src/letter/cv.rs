// src/letter/cv.rs
use std::path::Path;
use tracing::{info, warn};

/// Lines starting with these carry layout only, not CV content.
const MARKUP_DIRECTIVES: [&str; 6] = [
    "\\usepackage",
    "\\define",
    "\\setmainfont",
    "\\geometry",
    "\\titleformat",
    "\\newcommand",
];

const COMMENT_PREFIX: &str = "%";

/// The candidate's CV as loaded from disk, plus its cleaned text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CvDocument {
    raw_markup: String,
    cleaned_text: String,
}

impl CvDocument {
    pub fn new(raw_markup: impl Into<String>) -> Self {
        let raw_markup = raw_markup.into();
        let cleaned_text = clean_cv_markup(&raw_markup);
        Self {
            raw_markup,
            cleaned_text,
        }
    }

    /// Load a CV; a missing or unreadable file yields an empty document.
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                info!("Loaded CV from {}", path.display());
                Self::new(content)
            }
            Err(e) => {
                warn!("CV file not available at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn raw_markup(&self) -> &str {
        &self.raw_markup
    }

    pub fn cleaned_text(&self) -> &str {
        &self.cleaned_text
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned_text.is_empty()
    }
}

fn is_markup_line(trimmed: &str) -> bool {
    trimmed.starts_with(COMMENT_PREFIX)
        || MARKUP_DIRECTIVES
            .iter()
            .any(|directive| trimmed.starts_with(directive))
}

/// Drop blank lines, comments and layout directives; keep the rest verbatim.
pub fn clean_cv_markup(raw: &str) -> String {
    raw.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !is_markup_line(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
