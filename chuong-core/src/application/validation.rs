//! Advisory checks over segmented chapters
//!
//! Nothing here aborts the pipeline. Findings are returned as warnings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::application::config::defaults;
use crate::domain::Chapter;

/// A suspicious property of the chapter list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterWarning {
    /// The list is empty
    NoChapters,
    /// Numbers absent from the observed min..=max range (prologue excluded)
    MissingNumbers(Vec<u32>),
    /// A chapter body is shorter than the configured threshold
    ShortChapter {
        /// Chapter number
        number: u32,
        /// Body length in characters
        chars: usize,
    },
    /// Several chapters carry the same number; their chunk ids will collide
    DuplicateNumber(u32),
}

impl fmt::Display for ChapterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChapterWarning::NoChapters => write!(f, "No chapters found"),
            ChapterWarning::MissingNumbers(numbers) => {
                write!(f, "Missing chapter numbers: {numbers:?}")
            }
            ChapterWarning::ShortChapter { number, chars } => {
                write!(f, "Chapter {number} is very short ({chars} chars)")
            }
            ChapterWarning::DuplicateNumber(number) => {
                write!(f, "Chapter number {number} appears more than once")
            }
        }
    }
}

/// Check chapters with the default short-chapter threshold
pub fn validate_chapters(chapters: &[Chapter]) -> Vec<ChapterWarning> {
    validate_chapters_with(chapters, defaults::SHORT_CHAPTER_CHARS)
}

/// Check chapters for numbering gaps, duplicates and short bodies
pub fn validate_chapters_with(chapters: &[Chapter], short_chapter_chars: usize) -> Vec<ChapterWarning> {
    if chapters.is_empty() {
        return vec![ChapterWarning::NoChapters];
    }

    let mut warnings = Vec::new();

    let mut occurrences: BTreeMap<u32, usize> = BTreeMap::new();
    for chapter in chapters.iter().filter(|c| c.number > 0) {
        *occurrences.entry(chapter.number).or_insert(0) += 1;
    }

    if let (Some(&min), Some(&max)) = (occurrences.keys().next(), occurrences.keys().next_back()) {
        let present: BTreeSet<u32> = occurrences.keys().copied().collect();
        let missing: Vec<u32> = (min..=max).filter(|n| !present.contains(n)).collect();
        if !missing.is_empty() {
            warnings.push(ChapterWarning::MissingNumbers(missing));
        }
    }

    warnings.extend(
        occurrences
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(&number, _)| ChapterWarning::DuplicateNumber(number)),
    );

    for chapter in chapters {
        let chars = chapter.char_len();
        if chars < short_chapter_chars {
            warnings.push(ChapterWarning::ShortChapter {
                number: chapter.number,
                chars,
            });
        }
    }

    warnings
}
