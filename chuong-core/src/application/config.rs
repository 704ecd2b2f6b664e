//! Pipeline configuration and validation

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::tables::{defaults as charsets, CharTable};

/// Default configuration constants
pub mod defaults {
    /// Maximum characters per chunk
    pub const MAX_CHARS: usize = 7000;

    /// Share of pages a short line must appear on to count as boilerplate
    pub const BOILERPLATE_THRESHOLD: f64 = 0.3;

    /// Prologue text is kept only when longer than this many characters
    pub const PROLOGUE_MIN_CHARS: usize = 100;

    /// Chapters shorter than this are reported as suspicious
    pub const SHORT_CHAPTER_CHARS: usize = 100;

    /// Documents with more pages than this are sampled for boilerplate
    pub const LARGE_DOCUMENT_PAGES: usize = 200;

    /// Pages taken from each end of a sampled document
    pub const EDGE_PAGES: usize = 50;

    /// Pages taken from the middle of a sampled document
    pub const MIDDLE_SAMPLES: usize = 100;
}

/// Boilerplate sampling parameters for large documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Page count above which sampling kicks in
    pub large_document_pages: usize,
    /// Pages taken from the start and from the end
    pub edge_pages: usize,
    /// Pages taken evenly from the remainder
    pub middle_samples: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            large_document_pages: defaults::LARGE_DOCUMENT_PAGES,
            edge_pages: defaults::EDGE_PAGES,
            middle_samples: defaults::MIDDLE_SAMPLES,
        }
    }
}

/// Punctuation classes consulted by reflow and packing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PunctuationConfig {
    /// A line ending on one of these closes its sentence
    pub sentence_endings: Vec<char>,
    /// A line starting with one of these is never joined to the previous line
    pub list_markers: Vec<char>,
    /// Packing may cut a paragraph after one of these
    pub sentence_terminators: Vec<char>,
}

impl Default for PunctuationConfig {
    fn default() -> Self {
        Self {
            sentence_endings: charsets::SENTENCE_ENDINGS.to_vec(),
            list_markers: charsets::LIST_MARKERS.to_vec(),
            sentence_terminators: charsets::SENTENCE_TERMINATORS.to_vec(),
        }
    }
}

impl PunctuationConfig {
    /// Lookup table for sentence endings
    pub fn sentence_endings_table(&self) -> CharTable {
        CharTable::new(self.sentence_endings.iter().copied())
    }

    /// Lookup table for list markers
    pub fn list_markers_table(&self) -> CharTable {
        CharTable::new(self.list_markers.iter().copied())
    }
}

/// Configuration for the whole normalize → segment → pack pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum characters per chunk
    pub max_chars: usize,
    /// Boilerplate page-share threshold, in (0, 1]
    pub boilerplate_threshold: f64,
    /// Minimum prologue length (exclusive)
    pub prologue_min_chars: usize,
    /// Short-chapter warning threshold
    pub short_chapter_chars: usize,
    /// NFC-compose the raw text before line processing
    pub compose_unicode: bool,
    /// Boilerplate sampling for large documents
    pub sampling: SamplingConfig,
    /// Punctuation classes
    pub punctuation: PunctuationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chars: defaults::MAX_CHARS,
            boilerplate_threshold: defaults::BOILERPLATE_THRESHOLD,
            prologue_min_chars: defaults::PROLOGUE_MIN_CHARS,
            short_chapter_chars: defaults::SHORT_CHAPTER_CHARS,
            compose_unicode: true,
            sampling: SamplingConfig::default(),
            punctuation: PunctuationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_max_chars(self.max_chars)?;
        validate_threshold(self.boilerplate_threshold)?;

        if self.punctuation.sentence_terminators.is_empty() {
            return Err(CoreError::Configuration(
                "sentence_terminators must not be empty".into(),
            ));
        }

        Ok(())
    }
}

pub(crate) fn validate_max_chars(max_chars: usize) -> Result<()> {
    if max_chars == 0 {
        return Err(CoreError::InvalidArgument(format!(
            "max_chars must be positive, got {max_chars}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(CoreError::InvalidArgument(format!(
            "boilerplate threshold must be in (0, 1], got {threshold}"
        )));
    }
    Ok(())
}

/// Fluent builder for configuration
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    max_chars: Option<usize>,
    boilerplate_threshold: Option<f64>,
    prologue_min_chars: Option<usize>,
    short_chapter_chars: Option<usize>,
    compose_unicode: Option<bool>,
    sampling: Option<SamplingConfig>,
    punctuation: Option<PunctuationConfig>,
}

impl PipelineConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum characters per chunk
    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Set the boilerplate threshold
    pub fn boilerplate_threshold(mut self, threshold: f64) -> Self {
        self.boilerplate_threshold = Some(threshold);
        self
    }

    /// Set the minimum prologue length
    pub fn prologue_min_chars(mut self, chars: usize) -> Self {
        self.prologue_min_chars = Some(chars);
        self
    }

    /// Set the short-chapter warning threshold
    pub fn short_chapter_chars(mut self, chars: usize) -> Self {
        self.short_chapter_chars = Some(chars);
        self
    }

    /// Enable or disable NFC composition
    pub fn compose_unicode(mut self, enabled: bool) -> Self {
        self.compose_unicode = Some(enabled);
        self
    }

    /// Set boilerplate sampling parameters
    pub fn sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = Some(sampling);
        self
    }

    /// Set punctuation classes
    pub fn punctuation(mut self, punctuation: PunctuationConfig) -> Self {
        self.punctuation = Some(punctuation);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::default();

        if let Some(max_chars) = self.max_chars {
            config.max_chars = max_chars;
        }
        if let Some(threshold) = self.boilerplate_threshold {
            config.boilerplate_threshold = threshold;
        }
        if let Some(chars) = self.prologue_min_chars {
            config.prologue_min_chars = chars;
        }
        if let Some(chars) = self.short_chapter_chars {
            config.short_chapter_chars = chars;
        }
        if let Some(enabled) = self.compose_unicode {
            config.compose_unicode = enabled;
        }
        if let Some(sampling) = self.sampling {
            config.sampling = sampling;
        }
        if let Some(punctuation) = self.punctuation {
            config.punctuation = punctuation;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chars, 7000);
        assert_eq!(config.boilerplate_threshold, 0.3);
        assert_eq!(config.sampling.large_document_pages, 200);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::builder()
            .max_chars(500)
            .boilerplate_threshold(0.5)
            .compose_unicode(false)
            .build()
            .unwrap();
        assert_eq!(config.max_chars, 500);
        assert_eq!(config.boilerplate_threshold, 0.5);
        assert!(!config.compose_unicode);
        assert_eq!(config.prologue_min_chars, 100);
    }

    #[test]
    fn test_zero_max_chars_rejected() {
        let err = PipelineConfig::builder().max_chars(0).build().unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_threshold_range() {
        for threshold in [0.0, -0.1, 1.5, f64::NAN] {
            let result = PipelineConfig::builder()
                .boilerplate_threshold(threshold)
                .build();
            assert!(result.is_err(), "threshold {threshold} accepted");
        }
        assert!(PipelineConfig::builder()
            .boilerplate_threshold(1.0)
            .build()
            .is_ok());
    }

    #[test]
    fn test_empty_terminators_rejected() {
        let punctuation = PunctuationConfig {
            sentence_terminators: vec![],
            ..PunctuationConfig::default()
        };
        let err = PipelineConfig::builder()
            .punctuation(punctuation)
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"max_chars": 1200}"#).unwrap();
        assert_eq!(config.max_chars, 1200);
        assert_eq!(config.boilerplate_threshold, 0.3);
        assert_eq!(config.punctuation, PunctuationConfig::default());
    }
}
