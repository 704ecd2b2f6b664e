//! Plain text output formatter

use super::ChunkFormatter;
use anyhow::Result;
use chuong_core::Chunk;
use std::io::Write;

/// Plain text formatter - a banner line per chunk, then its text
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ChunkFormatter for TextFormatter<W> {
    fn format_part(&mut self, chunk: &Chunk, text: &str) -> Result<()> {
        writeln!(
            self.writer,
            "===== {} | {} | {} chars =====",
            chunk.chunk_id,
            chunk.context(),
            text.chars().count()
        )?;
        writeln!(self.writer, "{}", text.trim())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
