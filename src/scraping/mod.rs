// src/scraping/mod.rs
pub mod extractor;
pub mod job_scraper;

pub use extractor::{ContentExtractor, ExtractionStrategy, SelectorStrategy};
pub use job_scraper::JobScraper;
