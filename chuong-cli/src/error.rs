//! Error handling for the CLI application

use std::fmt;

/// Errors with a dedicated process exit code
#[derive(Debug)]
pub enum CliError {
    /// Input file missing or inaccessible
    InputNotFound(String),
    /// Page text could not be read or the page range is invalid
    Extraction(String),
    /// Most pages carry no text; the source needs OCR first
    ScanBasedInput {
        /// Pages with fewer than the minimum characters
        empty_pages: usize,
        /// Pages inspected
        total_pages: usize,
    },
    /// The external text transformer failed
    Transformer(String),
    /// Configuration error
    Configuration(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InputNotFound(_) => 1,
            CliError::Configuration(_) => 2,
            CliError::Extraction(_) => 10,
            CliError::ScanBasedInput { .. } => 11,
            CliError::Transformer(_) => 20,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InputNotFound(path) => write!(f, "Input file not found: {path}"),
            CliError::Extraction(msg) => write!(f, "Extraction error: {msg}"),
            CliError::ScanBasedInput {
                empty_pages,
                total_pages,
            } => {
                let ratio = if *total_pages > 0 {
                    *empty_pages as f64 / *total_pages as f64 * 100.0
                } else {
                    100.0
                };
                write!(
                    f,
                    "Input appears to be scan-based: {empty_pages}/{total_pages} pages ({ratio:.0}%) have no extractable text. Run OCR on the source first."
                )
            }
            CliError::Transformer(msg) => write!(f, "Transformer error: {msg}"),
            CliError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<chuong_core::CoreError> for CliError {
    fn from(err: chuong_core::CoreError) -> Self {
        CliError::Configuration(err.to_string())
    }
}

/// Exit code used when an error carries no specific code
pub const UNEXPECTED_EXIT_CODE: u8 = 99;

/// Exit code for an error chain: the first [`CliError`] found decides
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CliError>())
        .map_or(UNEXPECTED_EXIT_CODE, CliError::exit_code)
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::InputNotFound("a.txt".into()).exit_code(), 1);
        assert_eq!(CliError::Configuration("x".into()).exit_code(), 2);
        assert_eq!(CliError::Extraction("x".into()).exit_code(), 10);
        assert_eq!(
            CliError::ScanBasedInput {
                empty_pages: 8,
                total_pages: 10
            }
            .exit_code(),
            11
        );
        assert_eq!(CliError::Transformer("x".into()).exit_code(), 20);
    }

    #[test]
    fn test_display() {
        let error = CliError::InputNotFound("truyện.txt".to_string());
        assert_eq!(error.to_string(), "Input file not found: truyện.txt");

        let error = CliError::ScanBasedInput {
            empty_pages: 3,
            total_pages: 4,
        };
        assert!(error.to_string().contains("3/4 pages (75%)"));
        assert!(error.to_string().contains("OCR"));
    }

    #[test]
    fn test_exit_code_through_context() {
        let result: CliResult<()> = Err(CliError::Transformer("timeout".into()).into());
        let err = result.context("while polishing chunk chap_0001_part_001").unwrap_err();
        assert_eq!(exit_code(&err), 20);
    }

    #[test]
    fn test_unknown_errors_map_to_99() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code(&err), UNEXPECTED_EXIT_CODE);
    }

    #[test]
    fn test_core_error_becomes_configuration() {
        let err: CliError = chuong_core::CoreError::InvalidArgument("max_chars".into()).into();
        assert_eq!(err.exit_code(), 2);
    }
}
