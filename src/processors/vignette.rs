// pixtone/src/processors/vignette.rs
use crate::utils::clamp_channel;
use image::RgbaImage;

/// Radial falloff from the image center.
///
/// Positive values darken the edges, negative values lighten them. The
/// effect grows with the square of the normalized distance, which is `0`
/// at the center and `1` at the corners.
pub fn vignette(mut image: RgbaImage, value: f32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let max_dist_sq = cx * cx + cy * cy;
    if max_dist_sq <= 0.0 {
        return image;
    }

    let strength = value.abs() / 100.0;
    let direction = if value > 0.0 { -1.0 } else { 1.0 };

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let falloff = (dx * dx + dy * dy) / max_dist_sq;
        let factor = 1.0 + direction * strength * falloff;
        for channel in &mut pixel.0[..3] {
            *channel = clamp_channel(*channel as f32 * factor);
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gray(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([160, 160, 160, 255]))
    }

    #[test]
    fn darkens_corners_but_not_center() {
        let out = vignette(gray(9), 50.0);
        assert_eq!(out.get_pixel(4, 4).0[0], 160);
        assert_eq!(out.get_pixel(0, 0).0[0], 80);
        assert_eq!(out.get_pixel(8, 8).0[0], 80);
    }

    #[test]
    fn negative_lightens_corners() {
        let out = vignette(gray(9), -50.0);
        assert_eq!(out.get_pixel(4, 4).0[0], 160);
        assert_eq!(out.get_pixel(0, 8).0[0], 240);
    }

    #[test]
    fn single_pixel_is_unchanged() {
        let out = vignette(gray(1), 100.0);
        assert_eq!(out.get_pixel(0, 0).0[0], 160);
    }
}
