//! Lookup tables for punctuation classes
//!
//! All tables are allocation-free during lookup.

pub mod charset;

pub use charset::CharTable;

/// Default character sets
pub mod defaults {
    /// Marks that close a sentence at the end of an extracted line.
    ///
    /// Latin and Vietnamese terminators, CJK full-width variants, and the
    /// closing quotes/brackets a sentence commonly ends on in dialogue.
    pub const SENTENCE_ENDINGS: &[char] = &[
        '.', '!', '?', '…', ':', ';', '"', '\'', '“', '”', '’', '」', '』', '】', '）', ')', ']',
        '。', '！', '？',
    ];

    /// Characters that open a list item or a dialogue line
    pub const LIST_MARKERS: &[char] = &[
        '•', '·', '●', '○', '◆', '◇', '■', '□', '▪', '▫', '–', '—', '-',
    ];

    /// Terminators after which a paragraph may be cut between sentences
    pub const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '…', '。', '！', '？'];
}
