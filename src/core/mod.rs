// pixtone/src/core/mod.rs
pub mod adjustments;
pub mod pipeline;
pub mod processor;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use adjustments::{AdjustmentInput, AdjustmentSet, Knob, KnobViolation};
pub use pipeline::{AdjustmentPipeline, Stage, STAGES};
pub use processor::{ExportReport, ImageProcessor, PreviewImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    SameAsInput,
}

/// Named quality levels. Preview renders are cheaper than exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityPreset {
    Preview,
    Export,
}

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub preview_quality: u8,
    pub export_quality: u8,
    pub format: OutputFormat,
    pub suffix: String,
    pub optimize_png: bool,
    pub threads: usize,
    pub max_file_size: Option<u64>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            preview_quality: 90,
            export_quality: 95,
            format: OutputFormat::Jpeg,
            suffix: "edited".to_string(),
            optimize_png: true,
            threads: 1,
            max_file_size: None,
        }
    }
}

impl ProcessConfig {
    pub fn quality(&self, preset: QualityPreset) -> u8 {
        match preset {
            QualityPreset::Preview => self.preview_quality,
            QualityPreset::Export => self.export_quality,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, quality) in [
            ("preview-quality", self.preview_quality),
            ("export-quality", self.export_quality),
        ] {
            if quality == 0 || quality > 100 {
                return Err(Error::InvalidParameter(format!(
                    "{} must be between 1 and 100, got {}",
                    name, quality
                )));
            }
        }

        if self.suffix.is_empty() {
            return Err(Error::InvalidParameter(
                "Output suffix cannot be empty".to_string(),
            ));
        }

        if self.suffix.contains(['/', '\\']) {
            return Err(Error::InvalidParameter(format!(
                "Output suffix cannot contain path separators: {}",
                self.suffix
            )));
        }

        if self.max_file_size == Some(0) {
            return Err(Error::InvalidParameter(
                "Maximum file size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid adjustment: {}", ViolationList(.0))]
    InvalidAdjustment(Vec<KnobViolation>),

    #[error("Failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cancelled before processing started")]
    Cancelled,
}

impl Error {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Error::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

struct ViolationList<'a>(&'a [KnobViolation]);

impl fmt::Display for ViolationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn validate_config(config: &ProcessConfig) -> Result<()> {
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_distinct_presets() {
        let config = ProcessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quality(QualityPreset::Preview), 90);
        assert_eq!(config.quality(QualityPreset::Export), 95);
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let config = ProcessConfig {
            export_quality: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn rejects_suffix_with_separator() {
        let config = ProcessConfig {
            suffix: "a/b".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
