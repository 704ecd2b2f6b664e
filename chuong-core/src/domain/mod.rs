//! Domain model: chapters, chunks and the heading grammar

pub mod chapter;
pub mod chunk;
pub mod heading;

pub use chapter::{Chapter, PROLOGUE_NUMBER, PROLOGUE_TITLE, WHOLE_CONTENT_TITLE};
pub use chunk::Chunk;
pub use heading::{canonicalize_headings, find_headings, is_heading, HeadingMatch};
