//! CLI command implementations

use anyhow::Result;
use chuong_core::{Pipeline, PipelineOutput, Reporter};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{PageRange, PageSource};

pub mod chapters;
pub mod generate_config;
pub mod polish;
pub mod split;
pub mod validate_config;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split a novel into chapter-aligned chunks
    Split(split::SplitArgs),

    /// List detected chapters and validation warnings
    Chapters(chapters::ChaptersArgs),

    /// Rewrite every chunk through a transformer, with checkpoint/resume
    Polish(polish::PolishArgs),

    /// Write a configuration file with default values
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a configuration file
    ValidateConfig(validate_config::ValidateConfigArgs),
}

impl Commands {
    /// Run the selected command; `quiet` hides progress output
    pub fn execute(&self, quiet: bool) -> Result<()> {
        match self {
            Commands::Split(args) => args.execute(),
            Commands::Chapters(args) => args.execute(),
            Commands::Polish(args) => args.execute(quiet),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::ValidateConfig(args) => args.execute(),
        }
    }
}

/// Input selection shared by the text-processing commands
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Page text file, pages separated by form feeds
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// First page to read (1-based)
    #[arg(long, value_name = "PAGE", default_value_t = 1)]
    pub start_page: usize,

    /// Last page to read (0 = last page)
    #[arg(long, value_name = "PAGE", default_value_t = 0)]
    pub end_page: usize,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum characters per chunk
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,
}

impl InputArgs {
    /// Selected page range
    pub fn page_range(&self) -> PageRange {
        PageRange {
            start: self.start_page,
            end: self.end_page,
        }
    }

    /// Load the configuration file and apply flag overrides
    pub fn load_config(&self) -> Result<CliConfig> {
        let mut config = CliConfig::load_or_default(self.config.as_deref())?;
        if let Some(max_chars) = self.max_chars {
            config.pipeline.max_chars = max_chars;
        }
        config.validate()?;
        log::debug!("Configuration: {config:?}");
        Ok(config)
    }

    /// Read the selected pages and run the core pipeline over them
    pub fn run_pipeline(
        &self,
        config: &CliConfig,
        reporter: Arc<dyn Reporter>,
    ) -> Result<(PageSource, PipelineOutput)> {
        let source = PageSource::from_file(&self.input, self.page_range())?;
        let pipeline = Pipeline::new(config.pipeline.clone())
            .map_err(CliError::from)?
            .with_reporter(reporter);

        log::info!(
            "Read {} of {} pages ({} nearly empty)",
            source.pages().len(),
            source.total_pages(),
            source.empty_pages()
        );
        let output = pipeline.run_text(&source.raw_text(), Some(source.pages()));
        log::info!(
            "Pipeline finished in {:.2?}: {} chapters, {} chunks",
            output.duration,
            output.chapters.len(),
            output.chunks.len()
        );
        Ok((source, output))
    }

    /// Input file stem, used as a document title
    pub fn title(&self) -> String {
        self.input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::exit_code;

    fn input_args(input: &str) -> InputArgs {
        InputArgs {
            input: PathBuf::from(input),
            start_page: 1,
            end_page: 0,
            config: None,
            max_chars: None,
        }
    }

    #[test]
    fn test_max_chars_override() {
        let args = InputArgs {
            max_chars: Some(1200),
            ..input_args("truyen.txt")
        };
        assert_eq!(args.load_config().unwrap().pipeline.max_chars, 1200);
    }

    #[test]
    fn test_zero_max_chars_is_configuration_error() {
        let args = InputArgs {
            max_chars: Some(0),
            ..input_args("truyen.txt")
        };
        assert_eq!(exit_code(&args.load_config().unwrap_err()), 2);
    }

    #[test]
    fn test_missing_input() {
        let args = input_args("/nonexistent/truyen.txt");
        let config = CliConfig::default();
        let err = args
            .run_pipeline(&config, chuong_core::reporter::noop())
            .unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_title_from_stem() {
        assert_eq!(input_args("sach/Tiên Hiệp.txt").title(), "Tiên Hiệp");
        assert_eq!(input_args("truyen").title(), "truyen");
    }

    #[test]
    fn test_page_range() {
        let args = InputArgs {
            start_page: 3,
            end_page: 9,
            ..input_args("truyen.txt")
        };
        assert_eq!(args.page_range(), PageRange { start: 3, end: 9 });
    }
}
