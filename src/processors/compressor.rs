// pixtone/src/processors/compressor.rs
use crate::core::{Error, OutputFormat, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};
use oxipng::{optimize_from_memory, Options};
use std::io::Cursor;
use std::path::Path;

/// Encodes adjusted images to bytes or files at a fixed quality.
pub struct Compressor {
    quality: u8,
    optimize_png: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: true,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());

        match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel.
                let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
                rgb.write_with_encoder(encoder).map_err(encode_error)?;
            }
            ImageFormat::Png => {
                image
                    .write_with_encoder(PngEncoder::new(&mut buffer))
                    .map_err(encode_error)?;
                if self.optimize_png {
                    return self.optimize_png_bytes(&buffer.into_inner());
                }
            }
            ImageFormat::WebP => {
                // The bundled WebP encoder is lossless only, so quality does not apply.
                image
                    .write_with_encoder(WebPEncoder::new_lossless(&mut buffer))
                    .map_err(encode_error)?;
            }
            other => {
                return Err(Error::UnsupportedFormat(format!(
                    "cannot encode output as {:?}",
                    other
                )))
            }
        }

        Ok(buffer.into_inner())
    }

    pub fn save_with_format(&self, image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<u64> {
        log::debug!(
            "Saving image to {} with format {:?}, quality: {}",
            path.display(),
            format,
            self.quality
        );

        let bytes = self.compress_to_bytes(image, format)?;
        std::fs::write(path, &bytes)?;

        log::info!("Saved image: {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes.len() as u64)
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        optimize_from_memory(data, &Options::default())
            .map_err(|e| Error::Encode(format!("PNG optimization failed: {}", e)))
    }
}

fn encode_error(err: image::ImageError) -> Error {
    Error::Encode(err.to_string())
}

/// Resolves the encoder format and file extension for an export.
pub fn resolve_output(format: OutputFormat, input_path: &Path) -> (ImageFormat, &'static str) {
    match format {
        OutputFormat::Jpeg => (ImageFormat::Jpeg, "jpg"),
        OutputFormat::Png => (ImageFormat::Png, "png"),
        OutputFormat::WebP => (ImageFormat::WebP, "webp"),
        OutputFormat::SameAsInput => match ImageFormat::from_path(input_path) {
            Ok(ImageFormat::Png) => (ImageFormat::Png, "png"),
            Ok(ImageFormat::WebP) => (ImageFormat::WebP, "webp"),
            _ => (ImageFormat::Jpeg, "jpg"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(8, 8, |x, y| {
            Rgba([(x * 30) as u8, (y * 30) as u8, 90, 128])
        }))
    }

    #[test]
    fn encodes_jpeg_with_alpha_input() {
        let bytes = Compressor::new(80)
            .compress_to_bytes(&sample(), ImageFormat::Jpeg)
            .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let image = sample();
        let bytes = Compressor::new(80)
            .compress_to_bytes(&image, ImageFormat::Png)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.to_rgba8().as_raw(), image.to_rgba8().as_raw());
    }

    #[test]
    fn higher_quality_jpeg_is_not_smaller() {
        let image = sample();
        let low = Compressor::new(20).compress_to_bytes(&image, ImageFormat::Jpeg).unwrap();
        let high = Compressor::new(95).compress_to_bytes(&image, ImageFormat::Jpeg).unwrap();
        assert!(high.len() >= low.len());
    }

    #[test]
    fn unsupported_target_format() {
        let err = Compressor::new(90)
            .compress_to_bytes(&sample(), ImageFormat::Gif)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn same_as_input_falls_back_to_jpeg() {
        assert_eq!(
            resolve_output(OutputFormat::SameAsInput, Path::new("a.PNG")),
            (ImageFormat::Png, "png")
        );
        assert_eq!(
            resolve_output(OutputFormat::SameAsInput, Path::new("a.tiff")),
            (ImageFormat::Jpeg, "jpg")
        );
        assert_eq!(resolve_output(OutputFormat::Jpeg, Path::new("a.png")).1, "jpg");
    }
}
