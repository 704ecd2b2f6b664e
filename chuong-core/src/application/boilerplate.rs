//! Repeating header/footer detection
//!
//! Running headers, footers and page labels are short and recur on most
//! pages; narrative lines of the same length rarely do. A line is
//! boilerplate when its trimmed form, 3 to 40 characters long, appears on
//! at least `threshold` of the (sampled) pages.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::application::config::{defaults, validate_threshold, SamplingConfig};
use crate::error::Result;
use crate::reporter::{self, PipelineEvent, Reporter};

/// Documents with fewer pages give no statistical basis
const MIN_PAGES: usize = 3;

/// Candidate line length bounds, in characters
const MIN_LINE_CHARS: usize = 3;
const MAX_LINE_CHARS: usize = 40;

/// Which pages contribute to the statistics
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Every page counts
    Full,
    /// Above `large_document_pages`, take both ends plus an even stride
    /// through the middle. Deterministic for identical input.
    EdgesAndStride(SamplingConfig),
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        SamplingStrategy::EdgesAndStride(SamplingConfig::default())
    }
}

impl SamplingStrategy {
    /// Indices of pages to inspect, ascending and distinct
    pub fn select(&self, total_pages: usize) -> Vec<usize> {
        let config = match self {
            SamplingStrategy::Full => return (0..total_pages).collect(),
            SamplingStrategy::EdgesAndStride(config) => config,
        };

        if total_pages <= config.large_document_pages
            || total_pages <= config.edge_pages.saturating_mul(2)
        {
            return (0..total_pages).collect();
        }

        let head_end = config.edge_pages;
        let tail_start = total_pages - config.edge_pages;
        let middle_len = tail_start - head_end;

        let mut indices: Vec<usize> = (0..head_end).collect();
        if middle_len > config.middle_samples {
            // middle_len > samples, so the stride is > 1 and indices stay distinct
            let samples = config.middle_samples;
            indices.extend((0..samples).map(|i| head_end + i * middle_len / samples));
        } else {
            indices.extend(head_end..tail_start);
        }
        indices.extend(tail_start..total_pages);
        indices
    }
}

/// Detects lines that repeat across pages
pub struct BoilerplateDetector {
    threshold: f64,
    sampling: SamplingStrategy,
    reporter: Arc<dyn Reporter>,
}

impl Default for BoilerplateDetector {
    fn default() -> Self {
        Self {
            threshold: defaults::BOILERPLATE_THRESHOLD,
            sampling: SamplingStrategy::default(),
            reporter: reporter::noop(),
        }
    }
}

impl BoilerplateDetector {
    /// Create a detector with the given page-share threshold
    pub fn new(threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            sampling: SamplingStrategy::default(),
            reporter: reporter::noop(),
        })
    }

    /// Replace the sampling strategy
    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = sampling;
        self
    }

    /// Attach a reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Lines to discard from the document
    pub fn detect<S: AsRef<str>>(&self, pages: &[S]) -> HashSet<String> {
        if pages.len() < MIN_PAGES {
            return HashSet::new();
        }

        let sample = self.sampling.select(pages.len());
        let mut page_counts: HashMap<&str, usize> = HashMap::new();

        for &index in &sample {
            let mut seen_on_page: HashSet<&str> = HashSet::new();
            for line in pages[index].as_ref().lines() {
                let trimmed = line.trim();
                let chars = trimmed.chars().count();
                if (MIN_LINE_CHARS..=MAX_LINE_CHARS).contains(&chars)
                    && seen_on_page.insert(trimmed)
                {
                    *page_counts.entry(trimmed).or_insert(0) += 1;
                }
            }
        }

        let sampled = sample.len() as f64;
        let repeating: HashSet<String> = page_counts
            .into_iter()
            .filter(|&(_, count)| count as f64 / sampled >= self.threshold)
            .map(|(line, _)| line.to_string())
            .collect();

        if !repeating.is_empty() {
            self.reporter.report(&PipelineEvent::BoilerplateDetected {
                lines: repeating.len(),
                sampled_pages: sample.len(),
            });
        }

        repeating
    }
}

/// Detect boilerplate with default sampling
pub fn detect_boilerplate<S: AsRef<str>>(pages: &[S], threshold: f64) -> Result<HashSet<String>> {
    Ok(BoilerplateDetector::new(threshold)?.detect(pages))
}
