//! Size-bounded units of chapter text

use serde::{Deserialize, Serialize};
use std::fmt;

use super::heading::CHAPTER_WORD;

/// A contiguous slice of one chapter, the unit handed to the text transformer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Number of the chapter this chunk belongs to
    pub chapter_number: u32,
    /// Title of that chapter
    pub chapter_title: String,
    /// 1-based position within the chapter
    pub part_number: u32,
    /// Number of chunks the chapter was packed into
    pub total_parts: u32,
    /// Chunk body
    pub text: String,
    /// `chap_NNNN_part_NNN`, key for checkpointing and output pairing
    pub chunk_id: String,
}

impl Chunk {
    /// Build the identifier for a chapter/part pair
    pub fn make_id(chapter_number: u32, part_number: u32) -> String {
        format!("chap_{chapter_number:04}_part_{part_number:03}")
    }

    /// Returns true if the chapter was split into several parts
    pub fn is_multi_part(&self) -> bool {
        self.total_parts > 1
    }

    /// Length of the body in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Context line used when prompting, e.g. `Chương 3: Title — Phần 2/4`
    pub fn context(&self) -> String {
        if self.is_multi_part() {
            format!(
                "{CHAPTER_WORD} {}: {} — Phần {}/{}",
                self.chapter_number, self.chapter_title, self.part_number, self.total_parts
            )
        } else {
            format!(
                "{CHAPTER_WORD} {}: {}",
                self.chapter_number, self.chapter_title
            )
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({}, {} chars)", self.chunk_id, self.char_len())
    }
}
