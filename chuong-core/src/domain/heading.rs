//! Chapter heading grammar
//!
//! A heading is a line of the form `Chương N [sep Title]`: the word
//! "chương" in any case, one to five ASCII or full-width digits, then
//! optionally a separator from `: ： . - – —` and a title running to the
//! end of the line.

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Word that introduces a chapter heading
pub const CHAPTER_WORD: &str = "Chương";

/// Multiline scan for headings. Intra-line whitespace only, so a heading
/// never swallows the line after it.
const HEADING_LINE: &str =
    r"(?mi)^[^\S\n]*chương[^\S\n]+([0-9０-９]{1,5})[^\S\n]*(?:[:：.\-–—][^\S\n]*(.+?))?[^\S\n]*$";

/// Single-line test used by the reflow engine
const HEADING_PREFIX: &str = r"(?i)^\s*chương\s+[0-9０-９]{1,5}\s*(?:[:：.\-–—]|$)";

/// Rewrite target: headings written with a colon-like or dash separator
const CANONICAL_CANDIDATE: &str =
    r"(?m)^[^\S\n]*(?:Chương|CHƯƠNG|chương)[^\S\n]+([0-9０-９]{1,5})[^\S\n]*[:：\-–—][^\S\n]*(.+?)[^\S\n]*$";

fn heading_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HEADING_LINE).expect("heading pattern is valid"))
}

fn heading_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HEADING_PREFIX).expect("heading prefix pattern is valid"))
}

fn canonical_candidate() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(CANONICAL_CANDIDATE).expect("canonical heading pattern is valid")
    })
}

/// Value of a heading's digit group; full-width digits fold to ASCII
fn chapter_number(digits: &str) -> Option<u32> {
    digits.nfkc().collect::<String>().parse().ok()
}

/// A heading found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Chapter number from the heading digits
    pub number: u32,
    /// Title after the separator, if any
    pub title: Option<String>,
    /// Byte range of the matched heading text
    pub range: Range<usize>,
}

impl HeadingMatch {
    /// Title to show for the chapter, falling back to `Chương N`
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("{CHAPTER_WORD} {}", self.number),
        }
    }
}

/// Find all non-overlapping headings in document order
pub fn find_headings(text: &str) -> Vec<HeadingMatch> {
    heading_line()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = chapter_number(&caps[1])?;
            let title = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|t| !t.is_empty());
            Some(HeadingMatch {
                number,
                title,
                range: whole.range(),
            })
        })
        .collect()
}

/// Check whether a single line is a chapter heading
pub fn is_heading(line: &str) -> bool {
    heading_prefix().is_match(line.trim())
}

/// Rewrite every `Chương N <sep> Title` line to `Chương N: Title`, with
/// the digits in ASCII
pub fn canonicalize_headings(text: &str) -> String {
    canonical_candidate()
        .replace_all(text, |caps: &Captures<'_>| {
            let digits: String = caps[1].nfkc().collect();
            format!("{CHAPTER_WORD} {digits}: {}", caps[2].trim())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Option<HeadingMatch> {
        let mut found = find_headings(text);
        assert!(found.len() <= 1, "expected at most one heading in {text:?}");
        found.pop()
    }

    #[test]
    fn test_standard_format() {
        let heading = single("Chương 1: Thiếu Niên Anh Tuấn").unwrap();
        assert_eq!(heading.number, 1);
        assert_eq!(heading.title.as_deref(), Some("Thiếu Niên Anh Tuấn"));
    }

    #[test]
    fn test_uppercase_format() {
        let heading = single("CHƯƠNG 2: Gặp Gỡ Định Mệnh").unwrap();
        assert_eq!(heading.number, 2);
        assert_eq!(heading.title.as_deref(), Some("Gặp Gỡ Định Mệnh"));
    }

    #[test]
    fn test_separators() {
        let cases = [
            ("Chương 3： Tình Cờ Hội Ngộ", 3, "Tình Cờ Hội Ngộ"),
            ("Chương 4 - Tiểu Thư Sinh Phong Lưu", 4, "Tiểu Thư Sinh Phong Lưu"),
            ("Chương 5 – Bước Đường Công Danh", 5, "Bước Đường Công Danh"),
            ("Chương 100—Dấu gạch dài", 100, "Dấu gạch dài"),
            ("Chương 3. Kết thúc", 3, "Kết thúc"),
        ];
        for (text, number, title) in cases {
            let heading = single(text).unwrap_or_else(|| panic!("no heading in {text:?}"));
            assert_eq!(heading.number, number);
            assert_eq!(heading.title.as_deref(), Some(title));
        }
    }

    #[test]
    fn test_extra_whitespace() {
        let heading = single("  Chương   10  :   Thử Thách Mới   ").unwrap();
        assert_eq!(heading.number, 10);
        assert_eq!(heading.title.as_deref(), Some("Thử Thách Mới"));
    }

    #[test]
    fn test_bare_heading_has_no_title() {
        let heading = single("Chương 7").unwrap();
        assert_eq!(heading.number, 7);
        assert_eq!(heading.title, None);
        assert_eq!(heading.display_title(), "Chương 7");

        assert_eq!(single("Chương 999").unwrap().number, 999);
    }

    #[test]
    fn test_false_positives_rejected() {
        for text in [
            "Chương trình này rất hay",
            "Trong chương 5 hắn nói",
            "Một chương mới bắt đầu",
            "Chương",
            "Xem chương 1 để biết thêm chi tiết",
            "Đây là nội dung chương 2 của truyện",
            "Chapter 1 in English",
            "Chương 123456",
        ] {
            assert!(single(text).is_none(), "false positive on {text:?}");
            assert!(!is_heading(text), "false positive on {text:?}");
        }
    }

    #[test]
    fn test_bare_heading_does_not_swallow_next_line() {
        let text = "Chương 7\n- Ngươi là ai?\nHắn hỏi.";
        let found = find_headings(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, None);
        assert_eq!(&text[found[0].range.clone()], "Chương 7");
    }

    #[test]
    fn test_multiline_scan() {
        let text = "Some intro text here.\n\nChương 1: Đầu Tiên\n\nContent 1.\n\nChương 2: Thứ Hai\n\nContent 2.\n\nChương 3: Thứ Ba\n\nContent 3.\n";
        let numbers: Vec<u32> = find_headings(text).iter().map(|h| h.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_is_heading() {
        assert!(is_heading("Chương 1: Title"));
        assert!(is_heading("CHƯƠNG 10: Another Title"));
        assert!(is_heading("Chương 5 - Title Here"));
        assert!(is_heading("  chương 12  "));
        assert!(!is_heading("This is regular text"));
    }

    #[test]
    fn test_canonicalize_headings() {
        let text = "CHƯƠNG 2 - Gặp Gỡ\nnội dung\nchương 3 ：  Chia Ly  \nChương 4 — Trở Về";
        assert_eq!(
            canonicalize_headings(text),
            "Chương 2: Gặp Gỡ\nnội dung\nChương 3: Chia Ly\nChương 4: Trở Về"
        );
    }

    #[test]
    fn test_canonicalize_leaves_other_lines() {
        let text = "Chương 7\nChương 8. Tiêu đề\nXem chương 2 - phần cuối";
        assert_eq!(canonicalize_headings(text), text);
    }

    #[test]
    fn test_full_width_digits() {
        let heading = single("Chương １２: Mười Hai").unwrap();
        assert_eq!(heading.number, 12);
        assert_eq!(heading.title.as_deref(), Some("Mười Hai"));
        assert!(is_heading("CHƯƠNG ０７"));
        assert_eq!(
            canonicalize_headings("Chương １２ - Mười Hai"),
            "Chương 12: Mười Hai"
        );
    }

    #[test]
    fn test_other_script_digits_are_not_headings() {
        assert!(find_headings("Chương ٣: Ba").is_empty());
        assert!(!is_heading("Chương ٣"));
    }
}
