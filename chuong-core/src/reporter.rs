//! Observer interface for pipeline progress
//!
//! Stages never log on their own. They emit [`PipelineEvent`]s to an
//! injected [`Reporter`]; the default reporter discards them.

use std::fmt;
use std::sync::Arc;

use crate::application::validation::ChapterWarning;

/// How much attention an event deserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Progress information
    Info,
    /// Something the user should look at; processing continues
    Warn,
}

/// Events emitted by the pipeline stages
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Repeating header/footer lines were found
    BoilerplateDetected {
        /// Distinct lines marked for removal
        lines: usize,
        /// Pages the statistics were computed over
        sampled_pages: usize,
    },
    /// Normalization finished
    Normalized {
        /// Characters before normalization
        before_chars: usize,
        /// Characters after normalization
        after_chars: usize,
    },
    /// Chapter headings were found
    HeadingsFound(usize),
    /// No heading matched; the whole text became one chapter
    NoHeadings,
    /// Text before the first heading was kept as chapter 0
    PrologueFound {
        /// Prologue length in characters
        chars: usize,
    },
    /// Periodic segmentation progress
    ChaptersProcessed {
        /// Chapters built so far
        done: usize,
        /// Headings in the document
        total: usize,
    },
    /// Packing finished
    ChunksCreated {
        /// Chunks produced
        chunks: usize,
        /// Chapters consumed
        chapters: usize,
        /// Chapters that needed more than one part
        multi_part_chapters: usize,
    },
    /// Advisory finding from chapter validation
    Validation(ChapterWarning),
    /// Two chunks share an identifier (repeated chapter number)
    DuplicateChunkId(String),
}

impl PipelineEvent {
    /// Severity of the event
    pub fn severity(&self) -> Severity {
        match self {
            PipelineEvent::NoHeadings
            | PipelineEvent::Validation(_)
            | PipelineEvent::DuplicateChunkId(_) => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::BoilerplateDetected {
                lines,
                sampled_pages,
            } => write!(
                f,
                "Found {lines} repeating header/footer lines to remove ({sampled_pages} pages sampled)"
            ),
            PipelineEvent::Normalized {
                before_chars,
                after_chars,
            } => {
                let reduction = if *before_chars > 0 {
                    (1.0 - *after_chars as f64 / *before_chars as f64) * 100.0
                } else {
                    0.0
                };
                write!(
                    f,
                    "Preprocessing complete: {before_chars} -> {after_chars} chars ({reduction:.1}% reduced)"
                )
            }
            PipelineEvent::HeadingsFound(count) => write!(f, "Found {count} chapter headings"),
            PipelineEvent::NoHeadings => write!(
                f,
                "No chapter headings found! Using entire text as single chapter."
            ),
            PipelineEvent::PrologueFound { chars } => write!(
                f,
                "Found prologue/intro text before the first chapter ({chars} chars)"
            ),
            PipelineEvent::ChaptersProcessed { done, total } => {
                write!(f, "Processed {done}/{total} chapters...")
            }
            PipelineEvent::ChunksCreated {
                chunks,
                chapters,
                multi_part_chapters,
            } => {
                write!(f, "Created {chunks} chunks from {chapters} chapters")?;
                if *multi_part_chapters > 0 {
                    write!(
                        f,
                        " ({multi_part_chapters} chapters were split into multiple parts)"
                    )?;
                }
                Ok(())
            }
            PipelineEvent::Validation(warning) => write!(f, "{warning}"),
            PipelineEvent::DuplicateChunkId(id) => {
                write!(f, "Duplicate chunk id {id}: outputs for this id will collide")
            }
        }
    }
}

/// Receiver of pipeline events
pub trait Reporter: Send + Sync {
    /// Handle one event
    fn report(&self, event: &PipelineEvent);
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: &PipelineEvent) {}
}

impl<F> Reporter for F
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    fn report(&self, event: &PipelineEvent) {
        self(event)
    }
}

/// Shared default reporter
pub fn noop() -> Arc<dyn Reporter> {
    Arc::new(NoopReporter)
}
