//! Split command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::InputArgs;
use crate::output::{create_formatter, write_chunks, DocumentHeader, OutputFormat};
use crate::progress::LogReporter;

/// Arguments for the split command
#[derive(Debug, Args)]
pub struct SplitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl SplitArgs {
    /// Execute the split command
    pub fn execute(&self) -> Result<()> {
        log::info!("Splitting {}", self.input.input.display());

        let config = self.input.load_config()?;
        let (_, output) = self.input.run_pipeline(&config, LogReporter::shared(None))?;
        let format = self.format.unwrap_or(config.output.default_format);

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )),
            None => Box::new(io::stdout().lock()),
        };
        let header = DocumentHeader {
            title: self.input.title(),
            subtitle: None,
        };

        let mut formatter = create_formatter(format, writer, Some(header));
        write_chunks(
            formatter.as_mut(),
            output.chunks.iter().map(|chunk| (chunk, chunk.text.as_str())),
        )?;

        if let Some(path) = &self.output {
            log::info!("Wrote {} chunks to {}", output.chunks.len(), path.display());
        }
        Ok(())
    }
}
