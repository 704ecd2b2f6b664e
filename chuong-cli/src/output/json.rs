//! JSON output formatter

use super::ChunkFormatter;
use anyhow::Result;
use chuong_core::Chunk;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs chunks as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    records: Vec<ChunkRecord>,
}

/// Data structure for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// `chap_NNNN_part_NNN`
    pub chunk_id: String,
    /// Chapter number
    pub chapter_number: u32,
    /// Chapter title
    pub chapter_title: String,
    /// 1-based part index
    pub part_number: u32,
    /// Parts in the chapter
    pub total_parts: u32,
    /// Length of `text` in characters
    pub chars: usize,
    /// Chunk text or its rewritten output
    pub text: String,
}

impl ChunkRecord {
    /// Pair chunk metadata with a body
    pub fn new(chunk: &Chunk, text: &str) -> Self {
        Self {
            chunk_id: chunk.chunk_id.clone(),
            chapter_number: chunk.chapter_number,
            chapter_title: chunk.chapter_title.clone(),
            part_number: chunk.part_number,
            total_parts: chunk.total_parts,
            chars: text.chars().count(),
            text: text.to_string(),
        }
    }
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
        }
    }
}

impl<W: Write> ChunkFormatter for JsonFormatter<W> {
    fn format_part(&mut self, chunk: &Chunk, text: &str) -> Result<()> {
        self.records.push(ChunkRecord::new(chunk, text));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
