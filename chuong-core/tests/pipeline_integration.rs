//! End-to-end tests for the normalize → segment → pack pipeline

use chuong_core::application::{chapter_spans, PipelineConfig};
use chuong_core::domain::{find_headings, PROLOGUE_TITLE, WHOLE_CONTENT_TITLE};
use chuong_core::{normalize, pack, segment, ChapterWarning, CoreError, Pipeline};

const NOVEL: &str = "Chương 1: Thiếu Niên Khởi Hành

Lý Thanh Vân nhìn ra cửa sổ, trời đã sang thu. Gió lạnh thổi qua những hàng cây.

Chương 2: Gặp Gỡ Tại Kinh Thành

Kinh thành phồn hoa, người qua kẻ lại tấp nập.";

/// Pages with a running header, a page label and reflowable lines
fn book_pages() -> Vec<String> {
    let mut pages = Vec::new();
    for n in 1..=12 {
        let mut page = String::from("Tiên Hiệp Truyện - Tác giả Vô Danh\n");
        if n == 1 {
            page.push_str("CHƯƠNG 1 - Thiếu Niên Khởi Hành\n\n");
        }
        if n == 7 {
            page.push_str("\nchương 2 ： Gặp Gỡ Tại Kinh Thành\n\n");
        }
        page.push_str(&format!(
            "Đoạn văn thứ {n} kể rằng Lý Thanh Vân đi\nqua con đường thứ {n}, lòng\nđầy suy tư về kinh thành lần {n}.\n{n}"
        ));
        pages.push(page);
    }
    pages
}

#[test]
fn test_heading_grammar_precision() {
    let chapters = segment(NOVEL);
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].number, 1);
    assert_eq!(chapters[0].title, "Thiếu Niên Khởi Hành");
    assert!(chapters[0].text.contains("Lý Thanh Vân"));
    assert_eq!(chapters[1].number, 2);
    assert_eq!(chapters[1].title, "Gặp Gỡ Tại Kinh Thành");
    assert!(chapters[1].text.contains("Kinh thành"));
}

#[test]
fn test_no_heading_fallback() {
    let text = "\n  Truyện ngắn không chia chương.\n\nHết.\n ";
    let chapters = segment(text);
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].number, 1);
    assert_eq!(chapters[0].title, WHOLE_CONTENT_TITLE);
    assert_eq!(chapters[0].text, text.trim());
}

#[test]
fn test_prologue_threshold() {
    let long_intro = "x".repeat(150);
    let chapters = segment(&format!("{long_intro}\n\n{NOVEL}"));
    assert_eq!(chapters.len(), 3);
    assert_eq!(chapters[0].number, 0);
    assert_eq!(chapters[0].title, PROLOGUE_TITLE);

    let short_intro = "x".repeat(50);
    let chapters = segment(&format!("{short_intro}\n\n{NOVEL}"));
    assert_eq!(chapters.len(), 2);
    assert!(chapters.iter().all(|c| c.number != 0));
}

#[test]
fn test_boilerplate_removed_unique_line_kept() {
    let mut pages: Vec<String> = (0..10)
        .map(|i| format!("Nội dung trang {i} rất dài và độc nhất vô nhị trong sách"))
        .collect();
    for page in pages.iter_mut().take(3) {
        page.insert_str(0, "Truyện Chữ Hay\n");
    }
    pages[5].push_str("\nDòng độc nhất");
    let raw = pages.join("\n\n");

    let normalized = normalize(&raw, Some(pages.as_slice()));
    assert!(!normalized.contains("Truyện Chữ Hay"));
    assert!(normalized.contains("Dòng độc nhất"));
}

#[test]
fn test_invalid_max_chars() {
    let chapters = segment(NOVEL);
    assert!(matches!(pack(&chapters, 0), Err(CoreError::InvalidArgument(_))));
}

#[test]
fn test_segmentation_round_trip() {
    let text = format!("{}\n\n{NOVEL}\n\nChương 3\nCuối.", "Lời mở đầu. ".repeat(5));
    let spans = chapter_spans(&text);
    let headings = find_headings(&text);
    assert_eq!(spans.len(), headings.len());

    let mut without_headings = String::new();
    let mut cursor = 0;
    for heading in &headings {
        without_headings.push_str(&text[cursor..heading.range.start]);
        cursor = heading.range.end;
    }
    without_headings.push_str(&text[cursor..]);

    let prologue = &text[..spans[0].heading.range.start];
    let rebuilt: String = std::iter::once(prologue)
        .chain(spans.iter().map(|s| &text[s.body.clone()]))
        .collect();
    assert_eq!(rebuilt, without_headings);
}

#[test]
fn test_full_pipeline_over_pages() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let output = pipeline.run(&book_pages());

    assert!(!output.normalized.contains("Tiên Hiệp Truyện"));
    assert!(output.normalized.starts_with("Chương 1: Thiếu Niên Khởi Hành"));
    assert!(output
        .normalized
        .contains("\nChương 2: Gặp Gỡ Tại Kinh Thành\n"));
    assert!(output
        .normalized
        .contains("Lý Thanh Vân đi qua con đường thứ 3, lòng đầy suy tư về kinh thành lần 3."));

    assert_eq!(output.chapters.len(), 2);
    assert_eq!(output.chapters[1].title, "Gặp Gỡ Tại Kinh Thành");
    assert!(output.warnings.is_empty());
    assert_eq!(output.chunks.len(), 2);
}

#[test]
fn test_small_chunks_respect_order() {
    let config = PipelineConfig::builder().max_chars(200).build().unwrap();
    let output = Pipeline::new(config).unwrap().run(&book_pages());

    let mut previous = (0, 0);
    for chunk in &output.chunks {
        assert!(chunk.char_len() <= 200, "{chunk} too long");
        let key = (chunk.chapter_number, chunk.part_number);
        assert!(key > previous);
        previous = key;
    }
    assert!(output.chunks.iter().any(|c| c.total_parts > 1));
}

#[test]
fn test_validation_warnings_surface() {
    let text = "Chương 1: Một\n\nngắn.\n\nChương 3: Ba\n\ncũng ngắn.";
    let output = Pipeline::default().run_text::<&str>(text, None);
    assert!(output
        .warnings
        .contains(&ChapterWarning::MissingNumbers(vec![2])));
    assert!(output
        .warnings
        .iter()
        .any(|w| matches!(w, ChapterWarning::ShortChapter { number: 3, .. })));
}

#[test]
fn test_deterministic_output() {
    let pages = book_pages();
    let a = Pipeline::default().run(&pages);
    let b = Pipeline::default().run(&pages);
    assert_eq!(a.normalized, b.normalized);
    assert_eq!(a.chunks, b.chunks);
}
