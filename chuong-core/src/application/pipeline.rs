//! Normalize → segment → validate → pack orchestration

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::config::PipelineConfig;
use crate::application::normalizer::TextNormalizer;
use crate::application::packer::ChunkPacker;
use crate::application::segmenter::ChapterSegmenter;
use crate::application::validation::{validate_chapters_with, ChapterWarning};
use crate::domain::{Chapter, Chunk};
use crate::error::Result;
use crate::reporter::{self, PipelineEvent, Reporter};

/// Everything the pipeline derived from one document
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Normalized document text
    pub normalized: String,
    /// Chapters in document order
    pub chapters: Vec<Chapter>,
    /// Advisory findings about the chapters
    pub warnings: Vec<ChapterWarning>,
    /// Chunks in chapter/part order
    pub chunks: Vec<Chunk>,
    /// Wall time of the run
    pub duration: Duration,
}

impl PipelineOutput {
    /// Chunk ids that occur more than once, in first-seen order
    pub fn duplicate_chunk_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.chunks
            .iter()
            .map(|c| c.chunk_id.as_str())
            .filter(|id| !seen.insert(*id) && reported.insert(*id))
            .collect()
    }
}

/// The full text pipeline
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: TextNormalizer,
    segmenter: ChapterSegmenter,
    packer: ChunkPacker,
    reporter: Arc<dyn Reporter>,
}

impl Pipeline {
    /// Create a pipeline; fails when the configuration is invalid
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: TextNormalizer::new(&config)?,
            segmenter: ChapterSegmenter::new(&config),
            packer: ChunkPacker::from_config(&config)?,
            reporter: reporter::noop(),
            config,
        })
    }

    /// Attach a reporter to every stage
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.normalizer = self.normalizer.with_reporter(Arc::clone(&reporter));
        self.segmenter = self.segmenter.with_reporter(Arc::clone(&reporter));
        self.packer = self.packer.with_reporter(Arc::clone(&reporter));
        self.reporter = reporter;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run over per-page text; the document is the pages joined by a blank line
    pub fn run<S: AsRef<str>>(&self, pages: &[S]) -> PipelineOutput {
        let raw = pages
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n\n");
        self.run_text(&raw, Some(pages))
    }

    /// Run over already-joined text, with optional pages for boilerplate detection
    pub fn run_text<S: AsRef<str>>(&self, raw: &str, pages: Option<&[S]>) -> PipelineOutput {
        let start = Instant::now();

        let normalized = self.normalizer.normalize(raw, pages);
        let chapters = self.segmenter.segment(&normalized);

        let warnings = validate_chapters_with(&chapters, self.config.short_chapter_chars);
        for warning in &warnings {
            self.reporter
                .report(&PipelineEvent::Validation(warning.clone()));
        }

        let chunks = self.packer.pack(&chapters);

        let mut output = PipelineOutput {
            normalized,
            chapters,
            warnings,
            chunks,
            duration: Duration::ZERO,
        };
        for id in output.duplicate_chunk_ids() {
            self.reporter
                .report(&PipelineEvent::DuplicateChunkId(id.to_string()));
        }
        output.duration = start.elapsed();
        output
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            normalizer: TextNormalizer::default(),
            segmenter: ChapterSegmenter::default(),
            packer: ChunkPacker::default(),
            reporter: reporter::noop(),
        }
    }
}
