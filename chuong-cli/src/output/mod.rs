//! Output formatting module

use anyhow::Result;
use chuong_core::Chunk;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Trait for chunk formatters
pub trait ChunkFormatter {
    /// Format one chunk; `text` is the chunk text or its rewritten output
    fn format_part(&mut self, chunk: &Chunk, text: &str) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::{ChunkRecord, JsonFormatter};
pub use markdown::{DocumentHeader, MarkdownFormatter};
pub use text::TextFormatter;

/// Formats for the `split` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Chunks separated by id banners
    #[default]
    Text,
    /// JSON array of chunk records
    Json,
    /// Markdown with chapter and part headings
    Markdown,
}

/// Formats for polished exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `polished.md`
    #[default]
    Md,
    /// `polished.json`
    Json,
    /// Both files
    All,
}

impl ExportFormat {
    /// Flag value
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Md => "md",
            ExportFormat::Json => "json",
            ExportFormat::All => "all",
        }
    }

    /// Whether Markdown is written
    pub fn includes_markdown(&self) -> bool {
        matches!(self, ExportFormat::Md | ExportFormat::All)
    }

    /// Whether JSON is written
    pub fn includes_json(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::All)
    }
}

/// Create a formatter writing to `writer`
pub fn create_formatter<'w>(
    format: OutputFormat,
    writer: Box<dyn Write + 'w>,
    header: Option<DocumentHeader>,
) -> Box<dyn ChunkFormatter + 'w> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer, header)),
    }
}

/// Feed chunks through a formatter in order
pub fn write_chunks<'a, I>(formatter: &mut dyn ChunkFormatter, parts: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a Chunk, &'a str)>,
{
    for (chunk, text) in parts {
        formatter.format_part(chunk, text)?;
    }
    formatter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_selection() {
        assert!(ExportFormat::Md.includes_markdown());
        assert!(!ExportFormat::Md.includes_json());
        assert!(ExportFormat::All.includes_markdown() && ExportFormat::All.includes_json());
    }

    #[test]
    fn test_create_formatter_writes_json() {
        let chunk = Chunk {
            chapter_number: 1,
            chapter_title: "Một".into(),
            part_number: 1,
            total_parts: 1,
            text: "Văn bản.".into(),
            chunk_id: Chunk::make_id(1, 1),
        };
        let mut buffer = Vec::new();
        {
            let mut formatter = create_formatter(OutputFormat::Json, Box::new(&mut buffer), None);
            write_chunks(formatter.as_mut(), [(&chunk, chunk.text.as_str())]).unwrap();
        }
        let records: Vec<ChunkRecord> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(records[0].chunk_id, "chap_0001_part_001");
    }
}
