// pixtone/src/processors/mod.rs
pub mod color;
pub mod compressor;
pub mod detail;
pub mod tone;
pub mod vignette;

mod batch;
mod loader;
mod metadata;

pub use batch::{collect_image_paths, BatchProcessor, BatchReport, ImageOutcome};
pub use compressor::Compressor;
pub use loader::Loader;
pub use metadata::MetadataProcessor;

pub mod prelude {
    pub use super::{BatchProcessor, Compressor, Loader, MetadataProcessor};
}
