//! Markdown output formatter

use super::ChunkFormatter;
use anyhow::Result;
use chuong_core::Chunk;
use std::io::Write;

/// Title block written once at the top of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Document title, usually the input file stem
    pub title: String,
    /// Italic line under the title
    pub subtitle: Option<String>,
}

/// Markdown formatter - a `##` heading per chapter and a `###` heading per
/// part of a multi-part chapter
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    header: Option<DocumentHeader>,
    current_chapter: Option<u32>,
    chunk_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W, header: Option<DocumentHeader>) -> Self {
        Self {
            writer,
            header,
            current_chapter: None,
            chunk_count: 0,
        }
    }

    fn write_header(&mut self) -> Result<()> {
        if let Some(header) = self.header.take() {
            writeln!(self.writer, "# {}", header.title)?;
            if let Some(subtitle) = header.subtitle {
                writeln!(self.writer, "*{subtitle}*")?;
            }
            writeln!(self.writer)?;
            writeln!(self.writer, "---")?;
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

impl<W: Write> ChunkFormatter for MarkdownFormatter<W> {
    fn format_part(&mut self, chunk: &Chunk, text: &str) -> Result<()> {
        self.write_header()?;

        if self.current_chapter != Some(chunk.chapter_number) {
            self.current_chapter = Some(chunk.chapter_number);
            writeln!(
                self.writer,
                "## Chương {}: {}",
                chunk.chapter_number, chunk.chapter_title
            )?;
            writeln!(self.writer)?;
        }

        if chunk.is_multi_part() {
            writeln!(
                self.writer,
                "### Phần {}/{}",
                chunk.part_number, chunk.total_parts
            )?;
            writeln!(self.writer)?;
        }

        let text = text.trim();
        if !text.is_empty() {
            writeln!(self.writer, "{text}")?;
            writeln!(self.writer)?;
        }

        self.chunk_count += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.write_header()?;
        log::debug!("Markdown written: {} chunks", self.chunk_count);
        self.writer.flush()?;
        Ok(())
    }
}
