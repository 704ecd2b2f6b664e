//! Chunk packing
//!
//! Chapters longer than the size limit are cut at paragraph boundaries,
//! greedily filling each chunk. A paragraph that alone exceeds the limit is
//! cut at sentence boundaries the same way. A chunk boundary never falls
//! inside a sentence, so a single oversized sentence becomes its own chunk.

use regex::Regex;
use std::ops::Range;
use std::sync::{Arc, OnceLock};

use crate::application::config::{defaults, validate_max_chars, PipelineConfig};
use crate::domain::{Chapter, Chunk};
use crate::error::{CoreError, Result};
use crate::reporter::{self, PipelineEvent, Reporter};
use crate::tables::defaults::SENTENCE_TERMINATORS;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Terminator run followed by whitespace; group 1 is the terminators
fn boundary_regex(terminators: &[char]) -> Result<Regex> {
    if terminators.is_empty() {
        return Err(CoreError::Configuration(
            "sentence_terminators must not be empty".into(),
        ));
    }
    let class: String = terminators
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    Regex::new(&format!(r"([{class}]+)\s+"))
        .map_err(|e| CoreError::Configuration(format!("invalid sentence terminators: {e}")))
}

fn default_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        boundary_regex(SENTENCE_TERMINATORS).expect("default sentence terminators are valid")
    })
}

/// Accumulates pieces until the next one would overflow
struct GreedyBuffer<'a> {
    max_chars: usize,
    separator: &'a str,
    text: String,
    chars: usize,
}

impl<'a> GreedyBuffer<'a> {
    fn new(max_chars: usize, separator: &'a str) -> Self {
        Self {
            max_chars,
            separator,
            text: String::new(),
            chars: 0,
        }
    }

    /// Length of the buffer if `piece_chars` were appended
    fn len_with(&self, piece_chars: usize) -> usize {
        if self.text.is_empty() {
            piece_chars
        } else {
            self.chars + self.separator.chars().count() + piece_chars
        }
    }

    fn push(&mut self, piece: &str, piece_chars: usize, out: &mut Vec<String>) {
        if self.len_with(piece_chars) > self.max_chars {
            self.flush(out);
        }
        self.chars = self.len_with(piece_chars);
        if !self.text.is_empty() {
            self.text.push_str(self.separator);
        }
        self.text.push_str(piece);
    }

    fn flush(&mut self, out: &mut Vec<String>) {
        if !self.text.is_empty() {
            out.push(std::mem::take(&mut self.text));
            self.chars = 0;
        }
    }
}

/// Packs chapters into size-bounded chunks
pub struct ChunkPacker {
    max_chars: usize,
    sentence_boundary: Regex,
    reporter: Arc<dyn Reporter>,
}

impl ChunkPacker {
    /// Create a packer with the default sentence terminators
    pub fn new(max_chars: usize) -> Result<Self> {
        Self::with_terminators(max_chars, SENTENCE_TERMINATORS)
    }

    /// Create a packer from pipeline configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::with_terminators(config.max_chars, &config.punctuation.sentence_terminators)
    }

    /// Create a packer that cuts sentences after any of `terminators`
    pub fn with_terminators(max_chars: usize, terminators: &[char]) -> Result<Self> {
        validate_max_chars(max_chars)?;
        Ok(Self::from_parts(max_chars, boundary_regex(terminators)?))
    }

    fn from_parts(max_chars: usize, sentence_boundary: Regex) -> Self {
        Self {
            max_chars,
            sentence_boundary,
            reporter: reporter::noop(),
        }
    }

    /// Attach a reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Maximum characters per chunk
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Pack every chapter, preserving chapter order
    pub fn pack(&self, chapters: &[Chapter]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut multi_part_chapters = 0;

        for chapter in chapters {
            let parts = self.split_chapter(&chapter.text);
            if parts.len() > 1 {
                multi_part_chapters += 1;
            }

            let total_parts = parts.len() as u32;
            chunks.extend(parts.into_iter().enumerate().map(|(index, text)| {
                let part_number = index as u32 + 1;
                Chunk {
                    chapter_number: chapter.number,
                    chapter_title: chapter.title.clone(),
                    part_number,
                    total_parts,
                    text,
                    chunk_id: Chunk::make_id(chapter.number, part_number),
                }
            }));
        }

        self.reporter.report(&PipelineEvent::ChunksCreated {
            chunks: chunks.len(),
            chapters: chapters.len(),
            multi_part_chapters,
        });

        chunks
    }

    /// Texts of the parts of one chapter; always at least one
    pub fn split_chapter(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.chars().count() <= self.max_chars {
            return vec![text.to_string()];
        }

        let mut parts = Vec::new();
        let mut buffer = GreedyBuffer::new(self.max_chars, PARAGRAPH_SEPARATOR);

        for paragraph in text.split(PARAGRAPH_SEPARATOR) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            let chars = paragraph.chars().count();
            if chars > self.max_chars {
                buffer.flush(&mut parts);
                self.split_paragraph(paragraph, &mut parts);
            } else {
                buffer.push(paragraph, chars, &mut parts);
            }
        }
        buffer.flush(&mut parts);

        parts
    }

    /// Groups whole sentences into parts. Each part is a slice of the
    /// paragraph, so the whitespace between its sentences is kept as written.
    fn split_paragraph(&self, paragraph: &str, parts: &mut Vec<String>) {
        let mut current: Option<(Range<usize>, usize)> = None;

        for span in self.sentence_spans(paragraph) {
            let chars = paragraph[span.clone()].chars().count();
            if chars > self.max_chars {
                flush_span(paragraph, current.take(), parts);
                parts.push(paragraph[span].to_string());
                continue;
            }

            current = match current.take() {
                Some((open, open_chars)) => {
                    let joined = open_chars + paragraph[open.end..span.end].chars().count();
                    if joined <= self.max_chars {
                        Some((open.start..span.end, joined))
                    } else {
                        flush_span(paragraph, Some((open, open_chars)), parts);
                        Some((span, chars))
                    }
                }
                None => Some((span, chars)),
            };
        }
        flush_span(paragraph, current, parts);
    }

    /// Sentences of a paragraph, each ending on its terminator
    pub fn sentences<'t>(&self, paragraph: &'t str) -> Vec<&'t str> {
        self.sentence_spans(paragraph)
            .into_iter()
            .map(|span| &paragraph[span])
            .collect()
    }

    /// Byte ranges of the sentences, trimmed of surrounding whitespace
    fn sentence_spans(&self, paragraph: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut start = 0;

        for caps in self.sentence_boundary.captures_iter(paragraph) {
            let (Some(whole), Some(marks)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_trimmed(&mut spans, paragraph, start..marks.end());
            start = whole.end();
        }
        push_trimmed(&mut spans, paragraph, start..paragraph.len());

        spans
    }
}

fn push_trimmed(spans: &mut Vec<Range<usize>>, text: &str, span: Range<usize>) {
    let slice = &text[span.clone()];
    let trimmed = slice.trim_start();
    let start = span.start + (slice.len() - trimmed.len());
    let end = start + trimmed.trim_end().len();
    if start < end {
        spans.push(start..end);
    }
}

fn flush_span(text: &str, span: Option<(Range<usize>, usize)>, parts: &mut Vec<String>) {
    if let Some((span, _)) = span {
        parts.push(text[span].to_string());
    }
}

impl Default for ChunkPacker {
    fn default() -> Self {
        Self::from_parts(defaults::MAX_CHARS, default_boundary().clone())
    }
}

/// Pack chapters into chunks of at most `max_chars` characters
pub fn pack(chapters: &[Chapter], max_chars: usize) -> Result<Vec<Chunk>> {
    Ok(ChunkPacker::new(max_chars)?.pack(chapters))
}
