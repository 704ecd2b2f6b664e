//! Text transformer adapters
//!
//! A transformer rewrites one chunk given its prompt. Calls are issued one
//! at a time in chunk order; the caller owns pacing and persistence.

use anyhow::Result;
use chuong_core::Chunk;

use crate::prompt::Prompt;

/// Rewrites chunk text
pub trait TextTransformer {
    /// Identifier recorded in checkpoints; a changed label invalidates them
    fn label(&self) -> String;

    /// Produce the rewritten text for `chunk`
    fn rewrite(&self, chunk: &Chunk, prompt: &Prompt) -> Result<String>;
}

pub mod command;
pub mod passthrough;

pub use command::CommandTransformer;
pub use passthrough::PassthroughTransformer;
