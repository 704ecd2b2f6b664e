//! Chuong CLI library
//!
//! This library provides the command-line interface around `chuong-core`:
//! page-text input, prompt building, text transformers, checkpointed
//! polishing and the output renderers.

pub mod checkpoint;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod transform;

pub use error::{CliError, CliResult};
