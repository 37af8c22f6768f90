// pixtone/src/processors/detail.rs
use crate::utils::clamp_channel;
use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

const UNSHARP_AMOUNT: f32 = 1.0;

/// Smallest sigma handed to the Gaussian kernel. Below this the kernel
/// collapses to a single tap (or NaN once `2σ²` underflows), so the stage
/// is the identity.
const MIN_SIGMA: f32 = 0.01;

/// Positive values sharpen with an unsharp mask of sigma `value/20`;
/// negative values blur with sigma `|value|/20`.
pub fn sharpness(image: RgbaImage, value: f32) -> RgbaImage {
    let sigma = value.abs() / 20.0;
    if sigma.is_nan() || sigma < MIN_SIGMA {
        return image;
    }
    if value > 0.0 {
        unsharp_mask(image, sigma, UNSHARP_AMOUNT)
    } else {
        blur(image, sigma)
    }
}

fn blur(image: RgbaImage, sigma: f32) -> RgbaImage {
    let mut blurred = gaussian_blur_f32(&image, sigma);
    for (out, src) in blurred.pixels_mut().zip(image.pixels()) {
        out.0[3] = src.0[3];
    }
    blurred
}

fn unsharp_mask(mut image: RgbaImage, sigma: f32, amount: f32) -> RgbaImage {
    let blurred = gaussian_blur_f32(&image, sigma);
    for (pixel, soft) in image.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let original = pixel.0[c] as f32;
            let detail = original - soft.0[c] as f32;
            pixel.0[c] = clamp_channel(original + amount * detail);
        }
    }
    image
}
