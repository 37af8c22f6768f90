pub mod cli;
mod core;
mod processors;
mod utils;

pub use crate::cli::{AdjustmentArgs, Cli, Commands, FormatArg};
pub use crate::core::{
    validate_config, AdjustmentInput, AdjustmentPipeline, AdjustmentSet, Error, ExportReport,
    ImageProcessor, Knob, KnobViolation, OutputFormat, PreviewImage, ProcessConfig,
    QualityPreset, Result, Stage, STAGES,
};
pub use crate::processors::{
    collect_image_paths, BatchProcessor, BatchReport, Compressor, ImageOutcome, Loader,
    MetadataProcessor,
};
pub use crate::utils::{format_file_size, generate_output_path, is_supported_format};

/// Individual stage functions, for callers that want one adjustment alone.
pub mod stages {
    pub use crate::processors::{color, detail, tone, vignette};
}

pub mod prelude {
    pub use crate::{
        AdjustmentInput, AdjustmentPipeline, AdjustmentSet, BatchProcessor, ImageProcessor,
        Knob, ProcessConfig,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
