//! Application layer: the pipeline stages and their orchestration
//!
//! Each stage is a plain struct built from [`PipelineConfig`] with an
//! optional [`Reporter`](crate::reporter::Reporter). Stages consume the
//! previous stage's complete output; nothing here touches the filesystem.
//!
//! # Example
//!
//! ```rust
//! use chuong_core::application::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let output = pipeline.run(&["Chương 1: Khởi Đầu\nHắn bước\nra ngoài."]);
//!
//! assert_eq!(output.chapters[0].title, "Khởi Đầu");
//! assert_eq!(output.chunks[0].text, "Hắn bước ra ngoài.");
//! ```

pub mod boilerplate;
pub mod config;
pub mod normalizer;
pub mod packer;
pub mod pipeline;
pub mod reflow;
pub mod segmenter;
pub mod validation;

pub use boilerplate::{detect_boilerplate, BoilerplateDetector, SamplingStrategy};
pub use config::{PipelineConfig, PipelineConfigBuilder, PunctuationConfig, SamplingConfig};
pub use normalizer::{normalize, TextNormalizer};
pub use packer::{pack, ChunkPacker};
pub use pipeline::{Pipeline, PipelineOutput};
pub use reflow::{JoinRule, LinePair, LineReflow, ReflowTables};
pub use segmenter::{chapter_spans, segment, ChapterSegmenter, ChapterSpan};
pub use validation::{validate_chapters, validate_chapters_with, ChapterWarning};
