//! Configuration module
//!
//! One TOML file carries the core pipeline settings plus the CLI-only
//! polishing and output defaults. Command-line flags override file values.

use anyhow::{Context, Result};
use chuong_core::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CliError;
use crate::output::{ExportFormat, OutputFormat};
use crate::prompt::Mode;

/// Default delay between transformer calls, in milliseconds
pub const DEFAULT_SLEEP_MS: u64 = 250;

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Core pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Polishing configuration
    #[serde(default)]
    pub polish: PolishConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Polishing-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PolishConfig {
    /// Processing mode
    pub mode: Mode,

    /// Delay between transformer calls
    pub sleep_ms: u64,

    /// Transformer program followed by its arguments
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transformer_command: Vec<String>,

    /// Export format for polished output
    pub export: ExportFormat,
}

impl Default for PolishConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            sleep_ms: DEFAULT_SLEEP_MS,
            transformer_command: Vec::new(),
            export: ExportFormat::default(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Default format of the `split` command
    pub default_format: OutputFormat,
}

impl CliConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load a configuration file when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CliError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), CliError> {
        self.pipeline.validate()?;
        if let Some(program) = self.polish.transformer_command.first() {
            if program.trim().is_empty() {
                return Err(CliError::Configuration(
                    "transformer_command program must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.pipeline.max_chars, 7000);
        assert_eq!(config.polish.sleep_ms, 250);
        assert_eq!(config.polish.mode, Mode::PolishVi);
        assert_eq!(config.output.default_format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = CliConfig::from_toml(
            r#"
[pipeline]
max_chars = 3000

[polish]
mode = "translate-en"
transformer_command = ["llm", "--model", "small"]
"#,
        )
        .unwrap();
        assert_eq!(config.pipeline.max_chars, 3000);
        assert_eq!(config.pipeline.boilerplate_threshold, 0.3);
        assert_eq!(config.polish.mode, Mode::TranslateEn);
        assert_eq!(config.polish.transformer_command, vec!["llm", "--model", "small"]);
        assert_eq!(config.polish.sleep_ms, 250);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = CliConfig::default();
        config.polish.export = ExportFormat::All;
        config.pipeline.punctuation.list_markers.push('*');

        let text = config.to_toml().unwrap();
        assert!(text.contains("[pipeline]"));
        assert!(text.contains("[polish]"));
        assert_eq!(CliConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = CliConfig::from_toml("[pipeline]\nmax_chars = 0\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = CliConfig::from_toml("[pipeline]\nboilerplate_threshold = 2.0\n").unwrap_err();
        assert!(matches!(err, CliError::Configuration(_)));

        assert!(CliConfig::from_toml("[polish]\nmode = \"summarize\"\n").is_err());
        assert!(CliConfig::from_toml("[polish]\ntransformer_command = [\" \"]\n").is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[polish]\nsleep_ms = 0\n").unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.polish.sleep_ms, 0);
        assert!(CliConfig::load(Path::new("/nonexistent/chuong.toml")).is_err());
        assert_eq!(CliConfig::load_or_default(None).unwrap(), CliConfig::default());
    }
}
