// pixtone/src/utils/mod.rs
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "tiff", "tif", "bmp", "webp"];

/// Rounds and clamps a channel value into `[0, 255]`.
#[inline]
pub fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Rec. 601 luma of an RGBA pixel, in `[0, 255]`.
#[inline]
pub fn luma(pixel: &Rgba<u8>) -> f32 {
    let [r, g, b, _] = pixel.0;
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Builds a lookup table for a per-channel transfer function.
pub fn build_lut(f: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = clamp_channel(f(i as f32));
    }
    lut
}

/// Applies a lookup table to the color channels, leaving alpha untouched.
pub fn apply_lut(mut image: RgbaImage, lut: &[u8; 256]) -> RgbaImage {
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = lut[*channel as usize];
        }
    }
    image
}

/// Rewrites the color channels of every pixel through `f`.
///
/// `f` receives the pixel and returns unclamped RGB values.
pub fn map_rgb(mut image: RgbaImage, f: impl Fn(&Rgba<u8>) -> [f32; 3]) -> RgbaImage {
    for pixel in image.pixels_mut() {
        let [r, g, b] = f(pixel);
        pixel.0[0] = clamp_channel(r);
        pixel.0[1] = clamp_channel(g);
        pixel.0[2] = clamp_channel(b);
    }
    image
}

/// Adds a fixed offset to each color channel.
pub fn offset_rgb(image: RgbaImage, offset: [f32; 3]) -> RgbaImage {
    map_rgb(image, |pixel| {
        [
            pixel.0[0] as f32 + offset[0],
            pixel.0[1] as f32 + offset[1],
            pixel.0[2] as f32 + offset[2],
        ]
    })
}

/// Output path for an edited image: `<dir>/<stem>_<suffix>.<ext>`.
pub fn generate_output_path(
    input_path: &Path,
    output_dir: &Path,
    suffix: &str,
    extension: &str,
) -> PathBuf {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    output_dir.join(format!("{}_{}.{}", stem, suffix, extension))
}

/// `out/a_edited.jpg` with `n = 2` becomes `out/a_edited_2.jpg`.
pub fn numbered_output_path(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(name)
}

pub fn is_supported_format(path: &Path) -> bool {
    get_file_extension(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as i32).min(UNITS.len() as i32 - 1);
    let size = bytes_f64 / base.powi(exponent);

    format!("{:.2} {}", size, UNITS[exponent as usize])
}

pub fn image_format_to_string(format: image::ImageFormat) -> String {
    match format {
        image::ImageFormat::Jpeg => "JPEG",
        image::ImageFormat::Png => "PNG",
        image::ImageFormat::Gif => "GIF",
        image::ImageFormat::WebP => "WebP",
        image::ImageFormat::Tiff => "TIFF",
        image::ImageFormat::Bmp => "BMP",
        _ => "Unknown",
    }
    .to_string()
}
