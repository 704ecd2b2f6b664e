//! Prompt building for the text transformer
//!
//! Each chunk is sent with a fixed per-mode system prompt and a user prompt
//! carrying the chunk context, the optional style guide and glossary, and the
//! chunk text.

use anyhow::{Context, Result};
use chuong_core::Chunk;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no style guide is given
pub const STYLE_FILE: &str = "style.yaml";

/// File name searched for when no glossary is given
pub const GLOSSARY_FILE: &str = "glossary.json";

const SYSTEM_PROMPT_POLISH_VI: &str = "\
Bạn là biên tập viên tiểu thuyết cổ trang chuyển ngữ sang tiếng Việt.

Nhiệm vụ:
- Biên tập đoạn văn cho mượt mà, tự nhiên, dễ đọc.
- Giữ nguyên nội dung và tình tiết. Không thêm, bớt, tóm tắt hay bình luận.
- Sửa câu lủng củng, lặp từ và lối dịch máy móc.
- Thống nhất xưng hô, tước vị và tên riêng theo STYLE GUIDE và GLOSSARY.

Văn phong: cổ trang đời thường, câu gọn, tránh từ lóng hiện đại.

Chỉ trả về văn bản đã biên tập, không kèm giải thích.";

const SYSTEM_PROMPT_TRANSLATE_EN: &str = "\
You translate Vietnamese renderings of Chinese web novels into English.

Task:
- Produce natural, flowing English prose.
- Keep meaning, plot and tone intact; keep comedic timing without explaining jokes.
- Use the terms given in the GLOSSARY consistently.
- Keep honorifics where they carry meaning and keep the paragraph structure.

Return only the translated text, with no notes or commentary.";

/// What the transformer is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Edit Vietnamese prose in place
    #[default]
    PolishVi,
    /// Translate into English
    TranslateEn,
}

impl Mode {
    /// Stable identifier, recorded in checkpoints
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::PolishVi => "polish-vi",
            Mode::TranslateEn => "translate-en",
        }
    }

    /// System prompt for this mode
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Mode::PolishVi => SYSTEM_PROMPT_POLISH_VI,
            Mode::TranslateEn => SYSTEM_PROMPT_TRANSLATE_EN,
        }
    }

    /// Subtitle line for exported documents
    pub fn subtitle(&self) -> &'static str {
        match self {
            Mode::PolishVi => "Biên tập bởi AI",
            Mode::TranslateEn => "Dịch bởi AI",
        }
    }
}

/// A prompt pair for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instructions for the whole run
    pub system: &'static str,
    /// Chunk-specific request
    pub user: String,
}

/// Style guide and glossary text shared by every chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    /// YAML style guide, verbatim
    pub style: String,
    /// JSON glossary, verbatim
    pub glossary: String,
}

impl PromptContext {
    /// Read the given files; a missing path leaves that part empty
    pub fn load(style: Option<&Path>, glossary: Option<&Path>) -> Result<Self> {
        Ok(Self {
            style: read_optional(style)?,
            glossary: read_optional(glossary)?,
        })
    }

    /// Build the prompt pair for a chunk
    pub fn prompt(&self, mode: Mode, chunk: &Chunk) -> Prompt {
        Prompt {
            system: mode.system_prompt(),
            user: build_user_prompt(chunk, &self.style, &self.glossary),
        }
    }
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(String::new()),
    }
}

/// Look for `name` next to the input file, then in the working directory
pub fn find_default_file(input: &Path, name: &str) -> Option<PathBuf> {
    let input_dir = input.parent().map(Path::to_path_buf);
    let cwd = std::env::current_dir().ok();

    input_dir
        .into_iter()
        .chain(cwd)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// User prompt: context heading, optional style guide and glossary, then the text
pub fn build_user_prompt(chunk: &Chunk, style: &str, glossary: &str) -> String {
    let mut parts = vec![format!("## {}\n", chunk.context())];

    let style = style.trim();
    if !style.is_empty() {
        parts.push("### STYLE GUIDE:".into());
        parts.push("```yaml".into());
        parts.push(style.into());
        parts.push("```\n".into());
    }

    let glossary = glossary.trim();
    if !glossary.is_empty() && glossary != "{}" {
        parts.push("### GLOSSARY:".into());
        parts.push("```json".into());
        parts.push(glossary.into());
        parts.push("```\n".into());
    }

    parts.push("### TEXT TO EDIT:".into());
    parts.push(chunk.text.clone());

    parts.join("\n")
}
