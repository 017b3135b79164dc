// src/scraping/job_scraper.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use super::extractor::ContentExtractor;
use crate::core::FsOps;
use crate::types::ExtractionResult;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 10;
const SEPARATOR_WIDTH: usize = 80;

pub struct JobScraper {
    client: Client,
    extractor: ContentExtractor,
    output_dir: PathBuf,
}

impl JobScraper {
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            extractor: ContentExtractor::new(),
            output_dir,
        })
    }

    /// Wait `delay`, fetch one page and extract its posting text.
    pub async fn scrape_url(&self, url: &str, delay: Duration) -> ExtractionResult {
        info!("Scraping: {}", url);
        tokio::time::sleep(delay).await;

        match self.fetch_html(url).await {
            Ok(html) => {
                let content = self.extractor.extract(&html, url);
                info!("✅ Successfully scraped (length: {} chars)", content.chars().count());
                ExtractionResult::succeeded(url, content)
            }
            Err(e) => {
                warn!("❌ Failed to scrape {}: {:#}", url, e);
                ExtractionResult::failed(url, format!("{:#}", e))
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job post")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP error: {}", status);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Scrape every URL listed in `urls_file`, one after another.
    pub async fn scrape_from_file(
        &self,
        urls_file: &Path,
        delay: Duration,
        save_individual: bool,
    ) -> Vec<ExtractionResult> {
        let urls = match read_url_list(urls_file).await {
            Ok(urls) => urls,
            Err(e) => {
                error!("{:#}", e);
                return Vec::new();
            }
        };

        if urls.is_empty() {
            warn!("No URLs found in {}", urls_file.display());
            return Vec::new();
        }

        info!("Found {} URLs to scrape", urls.len());

        let mut results = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            info!("[{}/{}]", i + 1, urls.len());
            let result = self.scrape_url(url, delay).await;

            if save_individual {
                if let Some(content) = result.content.as_deref() {
                    let path = self.output_dir.join(filename_for(url, Local::now()));
                    match FsOps::write_file_safe(&path, content).await {
                        Ok(()) => info!("  Saved to: {}", path.display()),
                        Err(e) => error!("  Could not save {}: {:#}", url, e),
                    }
                }
            }

            results.push(result);
        }

        let successful = results.iter().filter(|r| r.success).count();
        info!("Scraping complete: {}/{} successful", successful, urls.len());

        results
    }

    /// Scrape every URL and write all successful postings to one file.
    ///
    /// Returns the combined file path, or `None` when nothing succeeded.
    pub async fn scrape_and_combine(
        &self,
        urls_file: &Path,
        output_file: Option<PathBuf>,
        delay: Duration,
    ) -> Result<Option<PathBuf>> {
        let results = self.scrape_from_file(urls_file, delay, false).await;

        let Some(combined) = combine_results(&results) else {
            warn!("No successful scrapes to combine");
            return Ok(None);
        };

        let output_file = output_file.unwrap_or_else(|| {
            self.output_dir.join(format!(
                "combined_jobs_{}.txt",
                Local::now().format("%Y%m%d_%H%M%S")
            ))
        });

        FsOps::write_file_safe(&output_file, &combined).await?;
        info!("Combined file created: {}", output_file.display());
        Ok(Some(output_file))
    }
}

/// Read a URL list: one URL per line, blank lines and `#` comments skipped.
pub async fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = FsOps::read_file_safe(path).await?;
    Ok(parse_url_list(&content))
}

pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `job_{host}_{YYYYMMDD_HHMMSS}.txt`, with a leading `www.` dropped from the host.
pub fn filename_for(url: &str, now: DateTime<Local>) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    format!("job_{}_{}.txt", domain, now.format("%Y%m%d_%H%M%S"))
}

/// Join successful results, each preceded by a rule of `=`.
pub fn combine_results(results: &[ExtractionResult]) -> Option<String> {
    let rule = "=".repeat(SEPARATOR_WIDTH);
    let mut parts = Vec::new();

    for content in results.iter().filter_map(|r| r.content.as_deref()) {
        parts.push(rule.clone());
        parts.push(content.to_string());
        parts.push("\n".to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
