//! Text normalization for PDF-extracted text
//!
//! Turns raw page text into flowing paragraphs: page labels and repeating
//! headers/footers are dropped, layout line breaks are reflowed, chapter
//! headings are rewritten to `Chương N: Title`, and blank-line runs are
//! collapsed to a single blank line.

use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use unicode_normalization::UnicodeNormalization;

use crate::application::boilerplate::{BoilerplateDetector, SamplingStrategy};
use crate::application::config::PipelineConfig;
use crate::application::reflow::LineReflow;
use crate::domain::heading::{self, canonicalize_headings};
use crate::error::Result;
use crate::reporter::{self, PipelineEvent, Reporter};

/// Bare number, dash-bracketed number, or `Page N` / `Trang N` / `p. N`
const PAGE_NUMBER: &str = r"(?i)^(?:\d+|[-—–]\s*\d+\s*[-—–]|(?:page|trang|p\.?)\s*\d+)$";

fn page_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PAGE_NUMBER).expect("page number pattern is valid"))
}

fn blank_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("blank run pattern is valid"))
}

/// Convert `\r\n` and lone `\r` to `\n`
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Check whether a line is only a page label
pub fn is_page_number_line(line: &str) -> bool {
    page_number().is_match(line.trim())
}

/// Orchestrates boilerplate removal, reflow and heading canonicalization
pub struct TextNormalizer {
    reflow: LineReflow,
    detector: BoilerplateDetector,
    compose_unicode: bool,
    reporter: Arc<dyn Reporter>,
}

impl TextNormalizer {
    /// Create a normalizer from pipeline configuration
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let detector = BoilerplateDetector::new(config.boilerplate_threshold)?
            .with_sampling(SamplingStrategy::EdgesAndStride(config.sampling.clone()));
        Ok(Self {
            reflow: LineReflow::from_config(&config.punctuation),
            detector,
            compose_unicode: config.compose_unicode,
            reporter: reporter::noop(),
        })
    }

    /// Attach a reporter, shared with the boilerplate detector
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.detector = self.detector.with_reporter(Arc::clone(&reporter));
        self.reporter = reporter;
        self
    }

    /// Replace the reflow engine
    pub fn with_reflow(mut self, reflow: LineReflow) -> Self {
        self.reflow = reflow;
        self
    }

    /// Normalize raw text. `pages`, when given, feeds boilerplate detection.
    pub fn normalize<S: AsRef<str>>(&self, raw: &str, pages: Option<&[S]>) -> String {
        let text = if self.compose_unicode {
            normalize_newlines(&raw.nfc().collect::<String>())
        } else {
            normalize_newlines(raw)
        };
        let before_chars = text.chars().count();

        let removal = match pages {
            Some(pages) if !pages.is_empty() => {
                if self.compose_unicode {
                    let composed: Vec<String> =
                        pages.iter().map(|p| p.as_ref().nfc().collect()).collect();
                    self.detector.detect(&composed)
                } else {
                    self.detector.detect(pages)
                }
            }
            _ => HashSet::new(),
        };

        let lines = self.reflow_lines(&text, &removal);
        let joined = canonicalize_headings(&lines.join("\n"));
        let result = blank_run()
            .replace_all(&joined, "\n\n")
            .trim()
            .to_string();

        self.reporter.report(&PipelineEvent::Normalized {
            before_chars,
            after_chars: result.chars().count(),
        });

        result
    }

    fn is_dropped(line: &str, removal: &HashSet<String>) -> bool {
        is_page_number_line(line) || removal.contains(line)
    }

    /// Single left-to-right pass over lines
    fn reflow_lines(&self, text: &str, removal: &HashSet<String>) -> Vec<String> {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let mut output: Vec<String> = Vec::with_capacity(lines.len());

        let mut i = 0;
        while i < lines.len() {
            let current = lines[i].trim();

            if Self::is_dropped(current, removal) {
                i += 1;
                continue;
            }

            if current.is_empty() {
                // One blank line survives as a paragraph separator
                if output.last().is_some_and(|last| !last.is_empty()) {
                    output.push(String::new());
                }
                i += 1;
                continue;
            }

            if !heading::is_heading(current) {
                if let Some(next) = lines.get(i + 1) {
                    let next = next.trim();
                    if !Self::is_dropped(next, removal) && self.reflow.should_join(current, next) {
                        // The merged line is re-examined against the line after it
                        let merged = format!("{current} {next}");
                        lines[i + 1] = merged;
                        i += 1;
                        continue;
                    }
                }
            }

            output.push(current.to_string());
            i += 1;
        }

        output
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            reflow: LineReflow::default(),
            detector: BoilerplateDetector::default(),
            compose_unicode: true,
            reporter: reporter::noop(),
        }
    }
}

/// Normalize with default configuration
pub fn normalize<S: AsRef<str>>(raw: &str, pages: Option<&[S]>) -> String {
    TextNormalizer::default().normalize(raw, pages)
}
