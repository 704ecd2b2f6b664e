//! Chapter records produced by segmentation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chapter number reserved for text preceding the first heading
pub const PROLOGUE_NUMBER: u32 = 0;

/// Title of the synthetic prologue chapter
pub const PROLOGUE_TITLE: &str = "Mở đầu";

/// Title of the whole-content fallback chapter
pub const WHOLE_CONTENT_TITLE: &str = "Toàn bộ nội dung";

/// A chapter of the novel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Number taken verbatim from the heading (0 = prologue)
    pub number: u32,
    /// Title after the heading separator
    pub title: String,
    /// Chapter body, trimmed
    pub text: String,
}

impl Chapter {
    /// Create a chapter record
    pub fn new(number: u32, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            text: text.into(),
        }
    }

    /// Returns true for the synthetic prologue chapter
    pub fn is_prologue(&self) -> bool {
        self.number == PROLOGUE_NUMBER
    }

    /// Length of the body in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Canonical heading line, `Chương N: Title`
    pub fn heading(&self) -> String {
        format!("{} {}: {}", super::heading::CHAPTER_WORD, self.number, self.title)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title: String = self.title.chars().take(30).collect();
        write!(
            f,
            "Chapter({}, '{}', {} chars)",
            self.number,
            title,
            self.char_len()
        )
    }
}
