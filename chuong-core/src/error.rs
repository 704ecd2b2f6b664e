//! Error types for the core pipeline
//!
//! Every stage is total over well-formed text. The only failures are
//! contract violations in the parameters the stages are built with.

use thiserror::Error;

/// Errors raised by the core pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A parameter violated its contract (e.g. `max_chars == 0`)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration value could not be accepted
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let error = CoreError::InvalidArgument("max_chars must be positive, got 0".into());
        assert_eq!(
            error.to_string(),
            "Invalid argument: max_chars must be positive, got 0"
        );
    }

    #[test]
    fn test_configuration_display() {
        let error = CoreError::Configuration("threshold out of range".into());
        assert!(error.to_string().starts_with("Configuration error:"));
    }
}
