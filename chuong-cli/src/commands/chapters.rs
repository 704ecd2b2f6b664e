//! Chapters command implementation

use anyhow::Result;
use chuong_core::{Chapter, ChapterWarning, Chunk};
use clap::Args;

use super::InputArgs;
use crate::progress::LogReporter;

/// Arguments for the chapters command
#[derive(Debug, Args)]
pub struct ChaptersArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRow {
    /// Chapter number
    pub number: u32,
    /// Chapter title
    pub title: String,
    /// Text length in characters
    pub chars: usize,
    /// Chunks the chapter was packed into
    pub parts: u32,
}

/// Pair each chapter with its part count; chunks arrive in chapter order
pub fn chapter_rows(chapters: &[Chapter], chunks: &[Chunk]) -> Vec<ChapterRow> {
    let mut position = 0;
    chapters
        .iter()
        .map(|chapter| {
            let parts = chunks.get(position).map_or(0, |chunk| chunk.total_parts);
            position += parts as usize;
            ChapterRow {
                number: chapter.number,
                title: chapter.title.clone(),
                chars: chapter.char_len(),
                parts,
            }
        })
        .collect()
}

/// Render the table and warnings
pub fn render_report(rows: &[ChapterRow], warnings: &[ChapterWarning]) -> String {
    let mut lines = vec![format!("{:>6}  {:>8}  {:>5}  {}", "Chương", "Chars", "Parts", "Title")];
    for row in rows {
        lines.push(format!(
            "{:>6}  {:>8}  {:>5}  {}",
            row.number, row.chars, row.parts, row.title
        ));
    }

    let chunks: u32 = rows.iter().map(|row| row.parts).sum();
    lines.push(String::new());
    lines.push(format!("Total: {} chapters, {} chunks", rows.len(), chunks));

    if !warnings.is_empty() {
        lines.push(String::new());
        for warning in warnings {
            lines.push(format!("Warning: {warning}"));
        }
    }
    lines.join("\n")
}

impl ChaptersArgs {
    /// Execute the chapters command
    pub fn execute(&self) -> Result<()> {
        let config = self.input.load_config()?;
        let (_, output) = self.input.run_pipeline(&config, LogReporter::shared(None))?;

        let rows = chapter_rows(&output.chapters, &output.chunks);
        println!("{}", render_report(&rows, &output.warnings));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chuong_core::pack;

    #[test]
    fn test_rows_follow_part_counts() {
        let chapters = vec![
            Chapter::new(1, "Một", "Ngắn."),
            Chapter::new(2, "Hai", "Câu một dài. Câu hai dài. Câu ba dài."),
            Chapter::new(3, "Ba", "Ngắn nữa."),
        ];
        let chunks = pack(&chapters, 14).unwrap();
        let rows = chapter_rows(&chapters, &chunks);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].parts, 1);
        assert_eq!(rows[1].parts, 3);
        assert_eq!(rows[2].parts, 1);
        assert_eq!(rows[2].title, "Ba");
    }

    #[test]
    fn test_report_lists_warnings() {
        let rows = vec![ChapterRow {
            number: 1,
            title: "Một".into(),
            chars: 5,
            parts: 1,
        }];
        let report = render_report(&rows, &[ChapterWarning::MissingNumbers(vec![2])]);
        assert!(report.contains("Total: 1 chapters, 1 chunks"));
        assert!(report.contains("Warning: Missing chapter numbers: [2]"));
        assert!(report.lines().nth(1).unwrap().ends_with("Một"));
    }
}
