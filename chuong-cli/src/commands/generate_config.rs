//! Generate config command implementation

use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::config::CliConfig;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            bail!(
                "{} already exists (use --force to replace it)",
                self.output.display()
            );
        }

        let template = CliConfig::default().to_toml()?;
        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Edit the values, e.g. pipeline.max_chars or polish.transformer_command");
        println!("2. Validate your configuration:");
        println!("   chuong validate-config -c {}", self.output.display());
        println!("3. Use it for processing:");
        println!("   chuong split -i novel.txt -c {}", self.output.display());

        Ok(())
    }
}
