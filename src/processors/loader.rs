// pixtone/src/processors/loader.rs
use crate::core::{Error, Result};
use crate::utils::image_format_to_string;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
    max_file_size: Option<u64>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
            max_file_size: None,
        }
    }

    pub fn with_max_file_size(mut self, bytes: Option<u64>) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = ImageReader::open(path)
            .map_err(|e| Error::decode(path, e))?
            .with_guessed_format()
            .map_err(|e| Error::decode(path, e))?
            .decode()
            .map_err(|e| Error::decode(path, e))?;

        self.check_dimensions(&image)?;

        let (width, height) = image.dimensions();
        log::debug!(
            "Loaded image: {}x{} pixels, format: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    pub fn load_from_bytes(&self, data: &[u8]) -> Result<DynamicImage> {
        if data.is_empty() {
            return Err(Error::decode("<memory>", "buffer is empty"));
        }

        let image = image::load_from_memory(data).map_err(|e| Error::decode("<memory>", e))?;
        self.check_dimensions(&image)?;
        Ok(image)
    }

    pub fn get_dimensions_and_format(&self, path: &Path) -> Result<(u32, u32, String)> {
        let reader = ImageReader::open(path)
            .map_err(|e| Error::decode(path, e))?
            .with_guessed_format()
            .map_err(|e| Error::decode(path, e))?;

        let format = reader
            .format()
            .map(image_format_to_string)
            .unwrap_or_else(|| "Unknown".to_string());

        let dimensions = reader
            .into_dimensions()
            .map_err(|e| Error::decode(path, e))?;

        Ok((dimensions.0, dimensions.1, format))
    }

    fn check_dimensions(&self, image: &DynamicImage) -> Result<()> {
        if let Some((max_w, max_h)) = self.max_dimensions {
            let (width, height) = image.dimensions();
            if width > max_w || height > max_h {
                return Err(Error::InvalidParameter(format!(
                    "Image dimensions {}x{} exceed maximum {}x{}",
                    width, height, max_w, max_h
                )));
            }
        }
        Ok(())
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path
            .metadata()
            .map_err(|e| Error::decode(path, format!("cannot read file: {}", e)))?;

        if metadata.len() == 0 {
            return Err(Error::decode(path, "file is empty"));
        }

        if let Some(max_size) = self.max_file_size {
            if metadata.len() > max_size {
                return Err(Error::InvalidParameter(format!(
                    "File size {} exceeds limit {}",
                    metadata.len(),
                    max_size
                )));
            }
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
