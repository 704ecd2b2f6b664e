//! Transformer that returns chunks unchanged

use super::TextTransformer;
use crate::prompt::Prompt;
use anyhow::Result;
use chuong_core::Chunk;

/// Returns the chunk text as is; used for dry runs
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTransformer;

impl TextTransformer for PassthroughTransformer {
    fn label(&self) -> String {
        "passthrough".to_string()
    }

    fn rewrite(&self, chunk: &Chunk, _prompt: &Prompt) -> Result<String> {
        Ok(chunk.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_chunk_text() {
        let chunk = Chunk {
            chapter_number: 1,
            chapter_title: "Một".into(),
            part_number: 1,
            total_parts: 1,
            text: "Nguyên văn.".into(),
            chunk_id: Chunk::make_id(1, 1),
        };
        let prompt = Prompt {
            system: "",
            user: String::new(),
        };
        assert_eq!(
            PassthroughTransformer.rewrite(&chunk, &prompt).unwrap(),
            "Nguyên văn."
        );
        assert_eq!(PassthroughTransformer.label(), "passthrough");
    }
}
