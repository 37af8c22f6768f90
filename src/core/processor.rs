// pixtone/src/core/processor.rs
use super::{AdjustmentPipeline, AdjustmentSet, ProcessConfig, QualityPreset, Result};
use crate::processors::compressor::resolve_output;
use crate::processors::{Compressor, Loader};
use crate::utils::generate_output_path;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};

/// An encoded preview ready for display.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl PreviewImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_before: u64,
    pub size_after: u64,
}

/// Loads, adjusts and encodes single images.
///
/// Preview and export share one [`AdjustmentPipeline`]; they differ only in
/// quality preset and destination.
pub struct ImageProcessor {
    config: ProcessConfig,
    loader: Loader,
    pipeline: AdjustmentPipeline,
    preview_compressor: Compressor,
    export_compressor: Compressor,
}

impl ImageProcessor {
    pub fn new(config: ProcessConfig) -> Result<Self> {
        config.validate()?;

        let loader = Loader::new().with_max_file_size(config.max_file_size);
        let preview_compressor = Compressor::new(config.quality(QualityPreset::Preview))
            .with_png_optimization(false);
        let export_compressor = Compressor::new(config.quality(QualityPreset::Export))
            .with_png_optimization(config.optimize_png);

        Ok(Self {
            config,
            loader,
            pipeline: AdjustmentPipeline::new(),
            preview_compressor,
            export_compressor,
        })
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Decodes and adjusts without encoding.
    pub fn render(&self, input_path: &Path, set: &AdjustmentSet) -> Result<DynamicImage> {
        let image = self.loader.load(input_path)?;
        self.pipeline.apply(&image, set)
    }

    pub fn preview(&self, input_path: &Path, set: &AdjustmentSet) -> Result<PreviewImage> {
        let adjusted = self.render(input_path, set)?;
        self.encode_preview(&adjusted)
    }

    pub fn preview_bytes(&self, data: &[u8], set: &AdjustmentSet) -> Result<PreviewImage> {
        let image = self.loader.load_from_bytes(data)?;
        let adjusted = self.pipeline.apply(&image, set)?;
        self.encode_preview(&adjusted)
    }

    fn encode_preview(&self, image: &DynamicImage) -> Result<PreviewImage> {
        let format = ImageFormat::Jpeg;
        let bytes = self.preview_compressor.compress_to_bytes(image, format)?;
        Ok(PreviewImage {
            bytes,
            format,
            width: image.width(),
            height: image.height(),
        })
    }

    /// Path an export of `input_path` would be written to.
    pub fn output_path_for(&self, input_path: &Path, output_dir: &Path) -> PathBuf {
        let (_, extension) = resolve_output(self.config.format, input_path);
        generate_output_path(input_path, output_dir, &self.config.suffix, extension)
    }

    pub fn export(&self, input_path: &Path, set: &AdjustmentSet, output_dir: &Path) -> Result<ExportReport> {
        let output_path = self.output_path_for(input_path, output_dir);
        self.export_to(input_path, set, output_path)
    }

    /// Like [`export`](Self::export), but writes to an explicit path. The
    /// encoder still follows the configured output format.
    pub fn export_to(&self, input_path: &Path, set: &AdjustmentSet, output_path: PathBuf) -> Result<ExportReport> {
        let size_before = std::fs::metadata(input_path).map(|m| m.len()).unwrap_or(0);
        let adjusted = self.render(input_path, set)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let (format, _) = resolve_output(self.config.format, input_path);
        let size_after = self
            .export_compressor
            .save_with_format(&adjusted, &output_path, format)?;

        Ok(ExportReport {
            output_path,
            width: adjusted.width(),
            height: adjusted.height(),
            size_before,
            size_after,
        })
    }
}
