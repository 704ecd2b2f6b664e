//! Validate config command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::error::CliError;

/// Arguments for the validate-config command
#[derive(Debug, Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    #[arg(short = 'c', long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateConfigArgs {
    /// Execute the validate-config command
    pub fn execute(&self) -> Result<()> {
        if !self.config.exists() {
            return Err(CliError::InputNotFound(self.config.display().to_string()).into());
        }
        println!("Validating configuration: {}", self.config.display());

        match CliConfig::load(&self.config) {
            Ok(config) => {
                println!("✓ Configuration is valid!");
                println!("  max_chars: {}", config.pipeline.max_chars);
                println!(
                    "  boilerplate_threshold: {}",
                    config.pipeline.boilerplate_threshold
                );
                println!("  mode: {}", config.polish.mode.as_str());
                println!("  export: {}", config.polish.export.as_str());
                if !config.polish.transformer_command.is_empty() {
                    println!(
                        "  transformer: {}",
                        config.polish.transformer_command.join(" ")
                    );
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::exit_code;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn validate(content: &str) -> Result<()> {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{content}").unwrap();
        ValidateConfigArgs {
            config: temp_file.path().to_path_buf(),
        }
        .execute()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate("[pipeline]\nmax_chars = 5000\n").is_ok());
        assert!(validate("").is_ok());
    }

    #[test]
    fn test_validate_invalid_config() {
        let err = validate("[pipeline]\nboilerplate_threshold = 0.0\n").unwrap_err();
        assert_eq!(exit_code(&err), 2);

        let err = validate("[pipeline\n").unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_validate_missing_file() {
        let err = ValidateConfigArgs {
            config: PathBuf::from("/nonexistent/chuong.toml"),
        }
        .execute()
        .unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }
}
