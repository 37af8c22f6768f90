// pixtone/src/processors/tone.rs
//! Tonal stages: brightness, exposure, contrast, highlights and shadows.
//!
//! Every function takes the knob value in `[-100, 100]` and returns a new
//! buffer with clamped 8-bit channels. Alpha is never touched.

use crate::utils::{apply_lut, build_lut, luma, map_rgb};
use image::RgbaImage;

/// Scales every channel by `1 + value/100`.
pub fn brightness(image: RgbaImage, value: f32) -> RgbaImage {
    let factor = 1.0 + value / 100.0;
    apply_lut(image, &build_lut(|c| c * factor))
}

/// Gamma curve with `gamma = 1 + value/200`, applied as `(c/255)^(1/gamma)`.
///
/// The knob sets the gamma, not the exponent, so positive values lift the
/// midtones and negative values darken them. Black and white stay fixed.
pub fn exposure(image: RgbaImage, value: f32) -> RgbaImage {
    let gamma = 1.0 + value / 200.0;
    let exponent = 1.0 / gamma;
    apply_lut(
        image,
        &build_lut(|c| 255.0 * (c / 255.0).powf(exponent)),
    )
}

/// Linear remap pivoting around mid-gray 128.
pub fn contrast(image: RgbaImage, value: f32) -> RgbaImage {
    let multiplier = 1.0 + value / 100.0;
    let offset = 128.0 * (1.0 - multiplier);
    apply_lut(image, &build_lut(|c| multiplier * c + offset))
}

/// Positive values pull bright pixels down, negative values push them up.
///
/// The multiplicative factor `1 - value/200` is blended in by luminance so
/// that dark pixels are left nearly alone.
pub fn highlights(image: RgbaImage, value: f32) -> RgbaImage {
    let delta = -value / 200.0;
    map_rgb(image, |pixel| {
        let weight = luma(pixel) / 255.0;
        let factor = 1.0 + delta * weight;
        [
            pixel.0[0] as f32 * factor,
            pixel.0[1] as f32 * factor,
            pixel.0[2] as f32 * factor,
        ]
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ShadowShift {
    Lift(f32),
    Deepen(f32),
}

impl ShadowShift {
    fn from_knob(value: f32) -> Self {
        if value > 0.0 {
            ShadowShift::Lift(value / 2.0)
        } else {
            ShadowShift::Deepen(value.abs() / 2.0)
        }
    }

    fn offset(self) -> f32 {
        match self {
            ShadowShift::Lift(amount) => amount,
            ShadowShift::Deepen(amount) => -amount,
        }
    }
}

/// Positive values lift dark pixels, negative values deepen them.
///
/// The additive offset is weighted by `1 - luma/255`, so highlights barely
/// move.
pub fn shadows(image: RgbaImage, value: f32) -> RgbaImage {
    let offset = ShadowShift::from_knob(value).offset();
    map_rgb(image, |pixel| {
        let weight = 1.0 - luma(pixel) / 255.0;
        let shift = offset * weight;
        [
            pixel.0[0] as f32 + shift,
            pixel.0[1] as f32 + shift,
            pixel.0[2] as f32 + shift,
        ]
    })
}
