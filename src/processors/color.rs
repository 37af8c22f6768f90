// pixtone/src/processors/color.rs
//! Color stages. Warmth and tint are separate additive shifts on different
//! channel combinations; when both are set they compose in pipeline order.

use crate::utils::{luma, map_rgb, offset_rgb};
use image::RgbaImage;

/// Scales each channel's distance from the pixel's luma by `1 + value/100`.
///
/// `-100` collapses every pixel to gray.
pub fn saturation(image: RgbaImage, value: f32) -> RgbaImage {
    let factor = 1.0 + value / 100.0;
    map_rgb(image, |pixel| {
        let y = luma(pixel);
        [
            y + (pixel.0[0] as f32 - y) * factor,
            y + (pixel.0[1] as f32 - y) * factor,
            y + (pixel.0[2] as f32 - y) * factor,
        ]
    })
}

/// Color temperature. Warm pushes red and half as much green, cool pushes blue.
pub fn warmth(image: RgbaImage, value: f32) -> RgbaImage {
    let offset = if value > 0.0 {
        [value, value / 2.0, 0.0]
    } else {
        [0.0, 0.0, value.abs()]
    };
    offset_rgb(image, offset)
}

/// Magenta/green balance.
pub fn tint(image: RgbaImage, value: f32) -> RgbaImage {
    let offset = if value > 0.0 {
        [value / 2.0, 0.0, value / 2.0]
    } else {
        [0.0, value.abs(), 0.0]
    };
    offset_rgb(image, offset)
}
