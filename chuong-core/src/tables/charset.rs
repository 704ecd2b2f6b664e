//! Character class lookup with O(1) membership
//!
//! Optimized for hot-path performance with ASCII fast-path. Used for the
//! punctuation sets the reflow and packing stages consult on every line.

use std::collections::HashSet;

/// Fast character set lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharTable {
    /// ASCII lookup table for chars 0-127
    ascii_table: [bool; 128],
    /// HashSet for non-ASCII members (quotes, CJK marks, dashes)
    non_ascii: HashSet<char>,
}

impl CharTable {
    /// Create from list of member characters
    pub fn new<I>(chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut ascii_table = [false; 128];
        let mut non_ascii = HashSet::new();

        for ch in chars {
            if ch.is_ascii() {
                ascii_table[ch as usize] = true;
            } else {
                non_ascii.insert(ch);
            }
        }

        Self {
            ascii_table,
            non_ascii,
        }
    }

    /// Check if character belongs to the table - hot path
    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        if ch.is_ascii() {
            self.ascii_table[ch as usize]
        } else {
            self.non_ascii.contains(&ch)
        }
    }

    /// Check the last character of `text`
    #[inline]
    pub fn ends(&self, text: &str) -> bool {
        text.chars().next_back().is_some_and(|ch| self.contains(ch))
    }

    /// Check the first character of `text`
    #[inline]
    pub fn starts(&self, text: &str) -> bool {
        text.chars().next().is_some_and(|ch| self.contains(ch))
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.ascii_table.iter().filter(|&&member| member).count() + self.non_ascii.len()
    }

    /// Returns true if the table has no members
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = CharTable::new(['.', '!', '?', '…', '。', '”']);

        // ASCII fast path
        assert!(table.contains('.'));
        assert!(table.contains('!'));
        assert!(!table.contains(','));

        // Non-ASCII
        assert!(table.contains('…'));
        assert!(table.contains('。'));
        assert!(table.contains('”'));
        assert!(!table.contains('ư'));
    }

    #[test]
    fn test_edges() {
        let table = CharTable::new(['.', '…']);
        assert!(table.ends("Anh ta đi về nhà."));
        assert!(table.ends("Chờ đã…"));
        assert!(!table.ends("Anh ta đi"));
        assert!(!table.ends(""));

        let markers = CharTable::new(['-', '—', '•']);
        assert!(markers.starts("— Ngươi là ai?"));
        assert!(markers.starts("• mục"));
        assert!(!markers.starts("về nhà."));
        assert!(!markers.starts(""));
    }

    #[test]
    fn test_len() {
        let table = CharTable::new(['.', '.', '…', '!']);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        assert!(CharTable::new([]).is_empty());
    }
}
