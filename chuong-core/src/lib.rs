//! Text pipeline for Vietnamese web novels extracted from PDF
//!
//! Raw page text goes through four stages:
//!
//! 1. **Normalization**: repeating headers/footers and page labels are
//!    dropped, layout line breaks are reflowed into sentences and chapter
//!    headings are rewritten to `Chương N: Title`.
//! 2. **Segmentation**: the text is split at chapter headings, with an
//!    optional prologue (chapter 0) and a whole-document fallback.
//! 3. **Validation**: numbering gaps, duplicates and short chapters are
//!    reported as warnings.
//! 4. **Packing**: chapters are cut into chunks of bounded size at
//!    paragraph and sentence boundaries, each with a stable id.
//!
//! Stages are pure and deterministic. Progress is observed through an
//! injected [`Reporter`].
//!
//! # Example
//!
//! ```rust
//! use chuong_core::{pack, segment};
//!
//! let text = "Chương 1: Thiếu Niên\n\nLý Thanh Vân nhìn ra cửa sổ.\n\n\
//!             Chương 2: Kinh Thành\n\nKinh thành phồn hoa.";
//! let chapters = segment(text);
//! assert_eq!(chapters.len(), 2);
//!
//! let chunks = pack(&chapters, 7000).unwrap();
//! assert_eq!(chunks[1].chunk_id, "chap_0002_part_001");
//! assert_eq!(chunks[1].context(), "Chương 2: Kinh Thành");
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod reporter;
pub mod tables;

pub use application::{
    detect_boilerplate, normalize, pack, segment, validate_chapters, BoilerplateDetector,
    ChapterSegmenter, ChapterWarning, ChunkPacker, LineReflow, Pipeline, PipelineConfig,
    PipelineOutput, TextNormalizer,
};
pub use domain::{Chapter, Chunk};
pub use error::{CoreError, Result};
pub use reporter::{NoopReporter, PipelineEvent, Reporter, Severity};
