//! Transformer backed by an external program

use anyhow::{Context, Result};
use chuong_core::Chunk;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use super::TextTransformer;
use crate::error::CliError;
use crate::prompt::Prompt;

/// Environment variable carrying the system prompt
pub const SYSTEM_PROMPT_ENV: &str = "CHUONG_SYSTEM_PROMPT";

/// Environment variable carrying the chunk id
pub const CHUNK_ID_ENV: &str = "CHUONG_CHUNK_ID";

/// Runs a program per chunk: the user prompt goes to stdin, the rewritten
/// text is read from stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTransformer {
    program: String,
    args: Vec<String>,
}

impl CommandTransformer {
    /// Create from a program and its arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Create from `[program, args...]`
    pub fn from_argv(argv: &[String]) -> Result<Self, CliError> {
        match argv.split_first() {
            Some((program, args)) if !program.trim().is_empty() => {
                Ok(Self::new(program.clone(), args.to_vec()))
            }
            _ => Err(CliError::Configuration(
                "transformer command must name a program".into(),
            )),
        }
    }
}

impl TextTransformer for CommandTransformer {
    fn label(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn rewrite(&self, chunk: &Chunk, prompt: &Prompt) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(SYSTEM_PROMPT_ENV, prompt.system)
            .env(CHUNK_ID_ENV, &chunk.chunk_id)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CliError::Transformer(format!("cannot start {}: {e}", self.program)))?;

        // stdin is written while stdout is drained
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CliError::Transformer("child stdin unavailable".into()))?;
        let input = prompt.user.clone();
        let writer = thread::spawn(move || {
            let mut stdin = stdin;
            stdin.write_all(input.as_bytes())
        });

        let output = child
            .wait_with_output()
            .with_context(|| format!("waiting for {}", self.program))?;
        let written = writer.join().map_err(|_| {
            CliError::Transformer(format!("writing the prompt to {} panicked", self.program))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::Transformer(format!(
                "{} failed on {} ({}): {}",
                self.program,
                chunk.chunk_id,
                output.status,
                stderr.trim()
            ))
            .into());
        }
        written.map_err(|e| {
            CliError::Transformer(format!(
                "{} did not read the whole prompt for {}: {e}",
                self.program, chunk.chunk_id
            ))
        })?;

        let text = String::from_utf8(output.stdout).map_err(|e| {
            CliError::Transformer(format!("{} produced invalid UTF-8: {e}", self.program))
        })?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CliError::Transformer(format!(
                "{} returned empty output for {}",
                self.program, chunk.chunk_id
            ))
            .into());
        }

        Ok(text.to_string())
    }
}
