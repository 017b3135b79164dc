// src/cli.rs
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use crate::batch::{BatchOptions, BatchOrchestrator};
use crate::config::{AppConfig, BackendKind, ConfigLayer};
use crate::core::{ConfigManager, FsOps};
use crate::error::PipelineError;
use crate::letter::{CoverLetterPipeline, CvDocument, PipelineSettings};
use crate::llm::{self, LlmClient};
use crate::scraping::JobScraper;
use crate::types::JobPosting;
use crate::utils::timestamped_letter_path;

#[derive(Parser)]
#[command(name = "letterforge")]
#[command(about = "Scrape job postings and generate tailored cover letters")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (YAML or TOML); defaults to ./config.yaml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Args, Default)]
pub struct BackendArgs {
    /// Backend flavour
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Backend base URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// API key for the hosted backend
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scrape job postings from a list of URLs
    Scrape {
        /// File with one URL per line
        #[arg(long, default_value = "offers/job_urls.txt")]
        urls_file: PathBuf,
        /// Directory to save scraped postings
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Delay before each request, in seconds
        #[arg(long)]
        delay: Option<f64>,
        /// Combine all postings into a single file
        #[arg(long)]
        combine: bool,
        /// Path of the combined file (only with --combine)
        #[arg(long, requires = "combine")]
        combined_output: Option<PathBuf>,
    },
    /// Generate one cover letter from a file, inline text or stdin
    Generate {
        #[arg(long, conflicts_with = "job_text")]
        job_file: Option<PathBuf>,
        #[arg(long)]
        job_text: Option<String>,
        #[arg(long)]
        cv: Option<PathBuf>,
        /// Output file (default: timestamped file in the output directory)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        temperature: Option<f32>,
    },
    /// Generate letters for every posting in a directory
    Batch {
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// Glob pattern for input files
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        cv: Option<PathBuf>,
        /// Move processed postings into the archive directory
        #[arg(long)]
        move_to_bin: bool,
        #[arg(long)]
        bin_dir: Option<PathBuf>,
        #[arg(long)]
        temperature: Option<f32>,
        /// Write a CSV report of all outcomes
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List the models the backend offers
    Models,
}

impl Cli {
    /// Settings given on the command line, as the highest-precedence layer.
    pub fn config_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer {
            backend: self.backend.backend,
            endpoint: self.backend.endpoint.clone(),
            api_key: self.backend.api_key.clone(),
            model: self.backend.model.clone(),
            ..Default::default()
        };

        match &self.command {
            Command::Scrape {
                output_dir, delay, ..
            } => {
                layer.input_dir = output_dir.clone();
                layer.scrape_delay_secs = *delay;
            }
            Command::Generate {
                cv, temperature, ..
            } => {
                layer.cv_path = cv.clone();
                layer.temperature = *temperature;
            }
            Command::Batch {
                input_dir,
                pattern,
                output_dir,
                cv,
                move_to_bin,
                bin_dir,
                temperature,
                ..
            } => {
                layer.input_dir = input_dir.clone();
                layer.input_pattern = pattern.clone();
                layer.output_dir = output_dir.clone();
                layer.cv_path = cv.clone();
                layer.move_to_bin = move_to_bin.then_some(true);
                layer.bin_dir = bin_dir.clone();
                layer.temperature = *temperature;
            }
            Command::Models => {}
        }

        layer
    }
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ConfigManager::load(cli.config.as_deref(), cli.config_layer())?;

    match cli.command {
        Command::Scrape {
            urls_file,
            combine,
            combined_output,
            ..
        } => run_scrape(&config, &urls_file, combine, combined_output).await,
        Command::Generate {
            job_file,
            job_text,
            output,
            ..
        } => run_generate(&config, job_file, job_text, output).await,
        Command::Batch { report, .. } => run_batch(&config, report).await,
        Command::Models => run_models(&config).await,
    }
}

async fn run_scrape(
    config: &AppConfig,
    urls_file: &PathBuf,
    combine: bool,
    combined_output: Option<PathBuf>,
) -> Result<()> {
    FsOps::ensure_dir_exists(&config.input_dir).await?;
    let scraper = JobScraper::new(config.input_dir.clone())?;

    if combine {
        scraper
            .scrape_and_combine(urls_file, combined_output, config.scrape_delay)
            .await?;
    } else {
        scraper
            .scrape_from_file(urls_file, config.scrape_delay, true)
            .await;
    }
    Ok(())
}

async fn build_pipeline(config: &AppConfig) -> Result<CoverLetterPipeline> {
    let client = llm::client_from_config(config)?;
    let cv = CvDocument::load(&config.cv_path).await;
    let settings = PipelineSettings {
        generation_timeout: config.generation_timeout,
        metadata_timeout: config.request_timeout,
        ..Default::default()
    };
    Ok(CoverLetterPipeline::new(client, cv, settings))
}

async fn read_job_posting(job_file: Option<PathBuf>, job_text: Option<String>) -> Result<JobPosting> {
    let text = match (job_file, job_text) {
        (Some(path), _) => {
            if !path.exists() {
                return Err(PipelineError::MissingInput(path).into());
            }
            FsOps::read_file_safe(&path).await?
        }
        (None, Some(text)) => text,
        (None, None) => {
            eprintln!("Paste the job posting, then press Ctrl+D (Ctrl+Z then Enter on Windows):");
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read job posting from stdin")?;
            buffer
        }
    };
    Ok(JobPosting::new(text))
}

async fn run_generate(
    config: &AppConfig,
    job_file: Option<PathBuf>,
    job_text: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let posting = read_job_posting(job_file, job_text).await?;
    if posting.is_blank() {
        anyhow::bail!("No job posting provided");
    }

    let pipeline = build_pipeline(config).await?;
    llm::verify_backend(pipeline.client(), &config.model)
        .await
        .context("Backend is not reachable")?;

    info!("Generating cover letter...");
    let letter = pipeline
        .generate_cover_letter(posting.text(), &config.model, config.temperature)
        .await?;

    let rule = "=".repeat(80);
    println!("\n{}\nGENERATED COVER LETTER\n{}\n\n{}\n\n{}", rule, rule, letter, rule);

    let output_path =
        output.unwrap_or_else(|| timestamped_letter_path(&config.output_dir, Local::now()));
    FsOps::write_file_safe(&output_path, &letter).await?;
    info!("Cover letter saved to: {}", output_path.display());
    Ok(())
}

async fn run_batch(config: &AppConfig, report_path: Option<PathBuf>) -> Result<()> {
    ConfigManager::ensure_directories(config).await?;
    let pipeline = build_pipeline(config).await?;

    if let Err(e) = llm::verify_backend(pipeline.client(), &config.model).await {
        warn!("Backend check failed, items will likely fail: {}", e);
    }

    let orchestrator = BatchOrchestrator::new(pipeline, BatchOptions::from_config(config));
    let report = orchestrator.run().await?;

    for failed in report.failed_items() {
        error!(
            "Failed: {} ({})",
            failed.source_path.display(),
            failed.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    println!("{}", report.summary());

    if let Some(path) = report_path {
        report.write_csv(&path)?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}

async fn run_models(config: &AppConfig) -> Result<()> {
    let client = llm::client_from_config(config)?;
    let models = list_models(client.as_ref()).await?;

    if models.is_empty() {
        println!("No models available");
    }
    for model in models {
        let marker = if llm::model_is_listed(std::slice::from_ref(&model), &config.model) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, model);
    }
    Ok(())
}

async fn list_models(client: &dyn LlmClient) -> Result<Vec<String>> {
    client
        .list_models()
        .await
        .context("Failed to list backend models")
}
