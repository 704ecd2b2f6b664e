//! Per-page text input
//!
//! PDF-to-text tools separate pages with a form feed. Each page is trimmed,
//! a page range can be selected, and inputs where most pages are empty are
//! rejected as scan-based.

use anyhow::Result;
use std::path::Path;

use super::FileReader;
use crate::error::CliError;

/// Page separator emitted by `pdftotext` and similar tools
pub const FORM_FEED: char = '\x0c';

/// Pages with fewer characters count as empty
pub const EMPTY_PAGE_CHARS: usize = 10;

/// Share of empty pages above which the input is rejected
pub const MAX_EMPTY_RATIO: f64 = 0.5;

/// 1-based inclusive page range; `end == 0` means the last page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// First page
    pub start: usize,
    /// Last page, 0 for the end of the document
    pub end: usize,
}

impl Default for PageRange {
    fn default() -> Self {
        Self { start: 1, end: 0 }
    }
}

impl PageRange {
    /// Resolve against a document of `total` pages into a 0-based half-open range
    pub fn resolve(&self, total: usize) -> Result<std::ops::Range<usize>, CliError> {
        let start = self.start.max(1);
        let end = if self.end == 0 || self.end > total {
            total
        } else {
            self.end
        };
        if start > end {
            return Err(CliError::Extraction(format!(
                "Invalid page range: {start}-{end}"
            )));
        }
        Ok(start - 1..end)
    }
}

/// Page texts selected from an input document
#[derive(Debug, Clone)]
pub struct PageSource {
    pages: Vec<String>,
    empty_pages: usize,
    total_pages: usize,
}

impl PageSource {
    /// Read a form-feed separated text file
    pub fn from_file(path: &Path, range: PageRange) -> Result<Self> {
        let text = FileReader::read_text(path)?;
        log::info!("Reading pages from {}", path.display());
        Ok(Self::from_text(&text, range)?)
    }

    /// Split text into pages and apply the range
    pub fn from_text(text: &str, range: PageRange) -> Result<Self, CliError> {
        let all: Vec<&str> = text.split(FORM_FEED).collect();
        // A trailing form feed closes the last page rather than opening a new one
        let total_pages = match all.last() {
            Some(last) if all.len() > 1 && last.trim().is_empty() => all.len() - 1,
            _ => all.len(),
        };
        log::info!("Input has {total_pages} pages");

        let selected = range.resolve(total_pages)?;
        log::info!("Using pages {} to {}", selected.start + 1, selected.end);

        let pages: Vec<String> = all[selected]
            .iter()
            .map(|page| page.trim().to_string())
            .collect();
        let empty_pages = pages
            .iter()
            .filter(|page| page.chars().count() < EMPTY_PAGE_CHARS)
            .count();

        let ratio = if pages.is_empty() {
            1.0
        } else {
            empty_pages as f64 / pages.len() as f64
        };
        if ratio > MAX_EMPTY_RATIO {
            return Err(CliError::ScanBasedInput {
                empty_pages,
                total_pages: pages.len(),
            });
        }
        if empty_pages > 0 {
            log::warn!("{empty_pages} pages had minimal or no text");
        }

        Ok(Self {
            pages,
            empty_pages,
            total_pages,
        })
    }

    /// Selected pages, trimmed
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Selected pages joined by a blank line
    pub fn raw_text(&self) -> String {
        self.pages.join("\n\n")
    }

    /// Selected pages with almost no text
    pub fn empty_pages(&self) -> usize {
        self.empty_pages
    }

    /// Pages in the whole document, before range selection
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }
}
