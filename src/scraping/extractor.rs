// src/scraping/extractor.rs
//! Turns an arbitrary job page into the plain text of its description.
//!
//! Extraction is an ordered chain of [`ExtractionStrategy`] values. Container
//! strategies are tried first and the first match wins; when none matches,
//! or the match holds no text, the structural fallbacks (`main`, `article`,
//! `body`) are tried, and the whole document is the last resort. Text inside
//! `script`, `style`, `nav`, `header` and `footer` is never emitted.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::utils::clean_text;

const STRIPPED_TAGS: [&str; 5] = ["script", "style", "nav", "header", "footer"];

/// One heuristic for locating the job description.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Text of the matched element, or `None` when nothing matches.
    fn attempt(&self, document: &Html) -> Option<String>;
}

/// Matches the first non-stripped element selected by a CSS selector.
pub struct SelectorStrategy {
    name: &'static str,
    css: &'static str,
}

impl SelectorStrategy {
    pub const fn new(name: &'static str, css: &'static str) -> Self {
        Self { name, css }
    }
}

impl ExtractionStrategy for SelectorStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn attempt(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(self.css).ok()?;
        document
            .select(&selector)
            .find(|element| !is_stripped(element))
            .map(|element| visible_text(&element))
    }
}

/// Container selectors commonly used for job descriptions, in priority order.
pub const CONTAINER_SELECTORS: [SelectorStrategy; 7] = [
    SelectorStrategy::new("class:job-description", ".job-description"),
    SelectorStrategy::new("class:job-details", ".job-details"),
    SelectorStrategy::new("class:posting-description", ".posting-description"),
    SelectorStrategy::new("id:job-description", "#job-description"),
    SelectorStrategy::new("role:main", "[role=\"main\"]"),
    SelectorStrategy::new("class:description", ".description"),
    SelectorStrategy::new("class:content", ".content"),
];

/// Structural fallbacks used when no container selector matched.
pub const STRUCTURAL_FALLBACKS: [SelectorStrategy; 3] = [
    SelectorStrategy::new("tag:main", "main"),
    SelectorStrategy::new("tag:article", "article"),
    SelectorStrategy::new("tag:body", "body"),
];

pub struct ContentExtractor {
    containers: Vec<Box<dyn ExtractionStrategy>>,
    fallbacks: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self {
            containers: CONTAINER_SELECTORS
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn ExtractionStrategy>)
                .collect(),
            fallbacks: STRUCTURAL_FALLBACKS
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn ExtractionStrategy>)
                .collect(),
        }
    }

    /// Build an extractor with a custom chain.
    pub fn with_strategies(
        containers: Vec<Box<dyn ExtractionStrategy>>,
        fallbacks: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            containers,
            fallbacks,
        }
    }

    /// Extract the posting text and prefix it with its source URL.
    pub fn extract(&self, html: &str, source_url: &str) -> String {
        format!("Source URL: {}\n\n{}", source_url, self.extract_text(html))
    }

    /// Extract and clean the posting text. Never fails; may return an empty string.
    pub fn extract_text(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        clean_text(&self.raw_text(&document))
    }

    fn raw_text(&self, document: &Html) -> String {
        let container = self.containers.iter().find_map(|strategy| {
            strategy.attempt(document).map(|text| (strategy.name(), text))
        });

        match container {
            Some((name, text)) if !text.trim().is_empty() => {
                debug!("Job content matched {}", name);
                return text;
            }
            Some((name, _)) => debug!("Container {} matched but holds no text", name),
            None => debug!("No job container matched, using structural fallback"),
        }

        for strategy in &self.fallbacks {
            if let Some(text) = strategy.attempt(document) {
                debug!("Job content taken from {}", strategy.name());
                return text;
            }
        }

        visible_text(&document.root_element())
    }
}

fn is_stripped_tag(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|element| STRIPPED_TAGS.contains(&element.name()))
}

/// True when the element or one of its ancestors is a stripped tag.
fn is_stripped(element: &ElementRef<'_>) -> bool {
    STRIPPED_TAGS.contains(&element.value().name())
        || element.ancestors().any(|node| is_stripped_tag(node.value()))
}

/// Concatenated text of an element, skipping stripped subtrees.
fn visible_text(element: &ElementRef<'_>) -> String {
    let mut text = String::new();
    push_visible_text(element, &mut text);
    text
}

fn push_visible_text(element: &ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(chunk) => out.push_str(chunk),
            node if is_stripped_tag(node) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_visible_text(&child_element, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> String {
        ContentExtractor::new().extract_text(html)
    }

    #[test]
    fn class_selector_beats_role_main() {
        let html = r#"<html><body>
            <div role="main"><p>Role main text</p></div>
            <div class="job-description"><p>Build APIs in Rust</p></div>
        </body></html>"#;
        assert_eq!(extract(html), "Build APIs in Rust");
    }

    #[test]
    fn selectors_are_tried_in_order() {
        let html = r#"<body>
            <div class="content">Generic content</div>
            <section id="job-description">By id</section>
            <div class="posting-description">Posting</div>
        </body>"#;
        assert_eq!(extract(html), "Posting");
    }

    #[test]
    fn class_match_works_with_multiple_classes() {
        let html = r#"<body><div class="card job-details wide">Details here</div></body>"#;
        assert_eq!(extract(html), "Details here");
    }

    #[test]
    fn falls_back_to_main_then_article_then_body() {
        let main = "<body><p>Intro</p><main>Main text</main><article>Article</article></body>";
        assert_eq!(extract(main), "Main text");

        let article = "<body><p>Intro</p><article>Article text</article></body>";
        assert_eq!(extract(article), "Article text");

        let body = "<body><p>Only body</p>\n<p>Second line</p></body>";
        assert_eq!(extract(body), "Only body\nSecond line");
    }

    #[test]
    fn strips_non_content_elements_everywhere() {
        let html = r#"<html><head><style>p { color: red }</style></head><body>
            <header>Site header</header>
            <nav>Jobs | About</nav>
            <main>
              <script>var tracking = 1;</script>
              <p>Senior Engineer</p>
            </main>
            <footer>Copyright</footer>
        </body></html>"#;
        assert_eq!(extract(html), "Senior Engineer");
    }

    #[test]
    fn containers_inside_stripped_elements_do_not_match() {
        let html = r#"<body>
            <header><div class="content">Header promo</div></header>
            <article>Real posting</article>
        </body>"#;
        assert_eq!(extract(html), "Real posting");
    }

    // A blank container is skipped rather than yielding an empty posting.
    #[test]
    fn empty_container_falls_back_to_structure() {
        let html = r#"<body><div class="job-description">   </div><main>Main text</main></body>"#;
        assert_eq!(extract(html), "Main text");
    }

    #[test]
    fn whitespace_noise_is_removed() {
        let html = "<body><div class='job-description'>\n\n   Backend Engineer   \n\t\n  <p>  Acme Corp </p>\n</div></body>";
        assert_eq!(extract(html), "Backend Engineer\nAcme Corp");
    }

    #[test]
    fn garbage_input_degrades_gracefully() {
        assert_eq!(extract(""), "");
        assert_eq!(extract("plain text, no markup"), "plain text, no markup");
    }

    #[test]
    fn custom_strategy_chain() {
        let extractor = ContentExtractor::with_strategies(
            vec![Box::new(SelectorStrategy::new(
                "attr:data-testid",
                "[data-testid=\"jobDescription\"]",
            ))],
            vec![Box::new(SelectorStrategy::new("tag:section", "section"))],
        );

        let html = r#"<body><div class="job-description">Generic</div>
            <div data-testid="jobDescription">Site specific</div></body>"#;
        assert_eq!(extractor.extract_text(html), "Site specific");

        let html = r#"<body><main>Main text</main><section>Section text</section></body>"#;
        assert_eq!(extractor.extract_text(html), "Section text");
    }

    #[test]
    fn extract_prefixes_source_url() {
        let html = "<body><div class='job-description'>Rust Engineer</div></body>";
        let text = ContentExtractor::new().extract(html, "https://jobs.example.com/1");
        assert_eq!(text, "Source URL: https://jobs.example.com/1\n\nRust Engineer");
    }
}
