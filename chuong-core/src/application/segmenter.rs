//! Chapter segmentation
//!
//! Splits normalized text at chapter headings. Each chapter body runs from
//! the end of its heading to the start of the next heading. Text ahead of
//! the first heading becomes chapter 0 only when it is substantial.

use std::ops::Range;
use std::sync::Arc;

use crate::application::config::{defaults, PipelineConfig};
use crate::domain::{
    find_headings, Chapter, HeadingMatch, PROLOGUE_NUMBER, PROLOGUE_TITLE, WHOLE_CONTENT_TITLE,
};
use crate::reporter::{self, PipelineEvent, Reporter};

/// Progress is reported after this many chapters
const PROGRESS_INTERVAL: usize = 50;

/// A heading together with the byte range of the body it introduces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSpan {
    /// The heading that opens the chapter
    pub heading: HeadingMatch,
    /// Body range, from heading end to the next heading start
    pub body: Range<usize>,
}

/// Locate chapter bodies without copying any text
pub fn chapter_spans(text: &str) -> Vec<ChapterSpan> {
    let headings = find_headings(text);
    let ends: Vec<usize> = headings
        .iter()
        .skip(1)
        .map(|h| h.range.start)
        .chain(std::iter::once(text.len()))
        .collect();

    headings
        .into_iter()
        .zip(ends)
        .map(|(heading, end)| {
            let body = heading.range.end..end;
            ChapterSpan { heading, body }
        })
        .collect()
}

/// Splits text into chapters
pub struct ChapterSegmenter {
    prologue_min_chars: usize,
    reporter: Arc<dyn Reporter>,
}

impl Default for ChapterSegmenter {
    fn default() -> Self {
        Self {
            prologue_min_chars: defaults::PROLOGUE_MIN_CHARS,
            reporter: reporter::noop(),
        }
    }
}

impl ChapterSegmenter {
    /// Create a segmenter from pipeline configuration
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            prologue_min_chars: config.prologue_min_chars,
            ..Self::default()
        }
    }

    /// Keep the prologue only when its trimmed length exceeds `chars`
    pub fn with_prologue_min_chars(mut self, chars: usize) -> Self {
        self.prologue_min_chars = chars;
        self
    }

    /// Attach a reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Split `text` into chapters in document order
    pub fn segment(&self, text: &str) -> Vec<Chapter> {
        let spans = chapter_spans(text);

        let Some(first) = spans.first() else {
            self.reporter.report(&PipelineEvent::NoHeadings);
            return vec![Chapter::new(1, WHOLE_CONTENT_TITLE, text.trim())];
        };

        let total = spans.len();
        self.reporter.report(&PipelineEvent::HeadingsFound(total));

        let mut chapters = Vec::with_capacity(total + 1);

        let prologue = text[..first.heading.range.start].trim();
        let prologue_chars = prologue.chars().count();
        if prologue_chars > self.prologue_min_chars {
            self.reporter.report(&PipelineEvent::PrologueFound {
                chars: prologue_chars,
            });
            chapters.push(Chapter::new(PROLOGUE_NUMBER, PROLOGUE_TITLE, prologue));
        }

        for (index, span) in spans.iter().enumerate() {
            chapters.push(Chapter::new(
                span.heading.number,
                span.heading.display_title(),
                text[span.body.clone()].trim(),
            ));

            let done = index + 1;
            if done % PROGRESS_INTERVAL == 0 || done == total {
                self.reporter
                    .report(&PipelineEvent::ChaptersProcessed { done, total });
            }
        }

        chapters
    }
}

/// Segment with default settings
pub fn segment(text: &str) -> Vec<Chapter> {
    ChapterSegmenter::default().segment(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const TWO_CHAPTERS: &str = "Chương 1: Thiếu Niên Khởi Hành\n\nLý Thanh Vân nhìn ra cửa sổ.\n\nChương 2: Gặp Gỡ Tại Kinh Thành\n\nKinh thành phồn hoa.";

    #[test]
    fn test_two_chapters() {
        let chapters = segment(TWO_CHAPTERS);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[0].title, "Thiếu Niên Khởi Hành");
        assert_eq!(chapters[0].text, "Lý Thanh Vân nhìn ra cửa sổ.");
        assert_eq!(chapters[1].number, 2);
        assert_eq!(chapters[1].title, "Gặp Gỡ Tại Kinh Thành");
        assert!(chapters[1].text.contains("Kinh thành"));
    }

    #[test]
    fn test_full_width_heading_digits() {
        let chapters = segment("Chương 1: Một\n\nnội dung một\n\nChương １２: Mười Hai\n\nnội dung mười hai");
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].number, 12);
        assert_eq!(chapters[1].title, "Mười Hai");
        assert_eq!(chapters[0].text, "nội dung một");
    }

    #[test]
    fn test_no_heading_fallback() {
        let chapters = segment("  Một câu chuyện không có chương.\n\nĐoạn hai.  ");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[0].title, WHOLE_CONTENT_TITLE);
        assert_eq!(chapters[0].text, "Một câu chuyện không có chương.\n\nĐoạn hai.");
    }

    #[test]
    fn test_empty_text() {
        let chapters = segment("");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].text, "");
    }

    #[test]
    fn test_bare_heading_uses_default_title() {
        let chapters = segment("Chương 7\nnội dung chương bảy");
        assert_eq!(chapters[0].number, 7);
        assert_eq!(chapters[0].title, "Chương 7");
        assert_eq!(chapters[0].text, "nội dung chương bảy");
    }

    #[test]
    fn test_prologue_kept_when_long() {
        let text = format!("{}\n\n{TWO_CHAPTERS}", "a".repeat(150));
        let chapters = segment(&text);
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].number, 0);
        assert_eq!(chapters[0].title, PROLOGUE_TITLE);
        assert_eq!(chapters[0].char_len(), 150);
    }

    #[test]
    fn test_prologue_dropped_when_short() {
        let text = format!("{}\n\n{TWO_CHAPTERS}", "a".repeat(50));
        let chapters = segment(&text);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 1);
    }

    #[test]
    fn test_prologue_boundary_is_exclusive() {
        let text = format!("{}\n{TWO_CHAPTERS}", "a".repeat(100));
        assert_eq!(segment(&text).len(), 2);
        let text = format!("{}\n{TWO_CHAPTERS}", "a".repeat(101));
        assert_eq!(segment(&text).len(), 3);
    }

    #[test]
    fn test_custom_prologue_threshold() {
        let text = format!("{}\n{TWO_CHAPTERS}", "a".repeat(30));
        let chapters = ChapterSegmenter::default()
            .with_prologue_min_chars(20)
            .segment(&text);
        assert!(chapters[0].is_prologue());
    }

    #[test]
    fn test_duplicate_numbers_are_kept() {
        let chapters = segment("Chương 5: A\nmột\nChương 5: B\nhai");
        assert_eq!(chapters.len(), 2);
        assert!(chapters.iter().all(|c| c.number == 5));
        assert_eq!(chapters[1].title, "B");
    }

    #[test]
    fn test_spans_cover_text_between_headings() {
        let spans = chapter_spans(TWO_CHAPTERS);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].body.end, spans[1].heading.range.start);
        assert_eq!(spans[1].body.end, TWO_CHAPTERS.len());
    }

    #[test]
    fn test_reports_progress() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let segmenter = ChapterSegmenter::default().with_reporter(Arc::new(
            move |e: &PipelineEvent| sink.lock().unwrap().push(e.clone()),
        ));

        let text: String = (1..=120)
            .map(|n| format!("Chương {n}: Tên {n}\nnội dung {n}\n"))
            .collect();
        segmenter.segment(&text);

        let events = events.lock().unwrap();
        assert_eq!(events[0], PipelineEvent::HeadingsFound(120));
        let progress: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::ChaptersProcessed { done, .. } => Some(*done),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![50, 100, 120]);
    }

    #[test]
    fn test_reports_missing_headings() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        ChapterSegmenter::default()
            .with_reporter(Arc::new(move |e: &PipelineEvent| {
                sink.lock().unwrap().push(e.clone())
            }))
            .segment("không có chương nào");
        assert_eq!(*events.lock().unwrap(), vec![PipelineEvent::NoHeadings]);
    }
}
