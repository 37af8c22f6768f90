// pixtone/src/core/pipeline.rs
use super::{AdjustmentSet, Error, Knob, Result};
use crate::processors::{color, detail, tone, vignette};
use image::{ColorType, DynamicImage, RgbaImage};

/// One step of the adjustment recipe.
///
/// A stage runs only when its knob is non-zero.
#[derive(Clone, Copy)]
pub struct Stage {
    pub knob: Knob,
    pub transform: fn(RgbaImage, f32) -> RgbaImage,
}

impl Stage {
    const fn new(knob: Knob, transform: fn(RgbaImage, f32) -> RgbaImage) -> Self {
        Self { knob, transform }
    }

    pub fn name(&self) -> &'static str {
        self.knob.name()
    }

    pub fn is_active(&self, set: &AdjustmentSet) -> bool {
        set.get(self.knob) != 0.0
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("knob", &self.knob).finish()
    }
}

/// The recipe, in the order stages are applied.
pub const STAGES: [Stage; 10] = [
    Stage::new(Knob::Brightness, tone::brightness),
    Stage::new(Knob::Exposure, tone::exposure),
    Stage::new(Knob::Contrast, tone::contrast),
    Stage::new(Knob::Highlights, tone::highlights),
    Stage::new(Knob::Shadows, tone::shadows),
    Stage::new(Knob::Vignette, vignette::vignette),
    Stage::new(Knob::Saturation, color::saturation),
    Stage::new(Knob::Warmth, color::warmth),
    Stage::new(Knob::Tint, color::tint),
    Stage::new(Knob::Sharpness, detail::sharpness),
];

/// Pixel layouts the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Rgb,
    Rgba,
}

impl Layout {
    fn of(image: &DynamicImage) -> Result<Self> {
        match image.color() {
            ColorType::Rgb8 | ColorType::L8 => Ok(Layout::Rgb),
            ColorType::Rgba8 | ColorType::La8 => Ok(Layout::Rgba),
            other => Err(Error::UnsupportedFormat(format!(
                "channel layout {:?} is not supported, expected 8-bit gray, RGB or RGBA",
                other
            ))),
        }
    }

    fn restore(self, buffer: RgbaImage) -> DynamicImage {
        let image = DynamicImage::ImageRgba8(buffer);
        match self {
            Layout::Rgba => image,
            Layout::Rgb => DynamicImage::ImageRgb8(image.to_rgb8()),
        }
    }
}

/// Applies an [`AdjustmentSet`] to images. Preview and export both go
/// through [`AdjustmentPipeline::apply`].
#[derive(Debug, Clone, Copy)]
pub struct AdjustmentPipeline {
    stages: &'static [Stage],
}

impl Default for AdjustmentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjustmentPipeline {
    pub fn new() -> Self {
        Self { stages: &STAGES }
    }

    /// A pipeline over a custom stage list. Used to compare recipes.
    pub fn with_stages(stages: &'static [Stage]) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        self.stages
    }

    pub fn apply(&self, image: &DynamicImage, set: &AdjustmentSet) -> Result<DynamicImage> {
        let layout = Layout::of(image)?;

        if set.is_identity() {
            log::debug!("No adjustments set, passing image through");
            return Ok(image.clone());
        }

        let buffer = self.run_stages(image.to_rgba8(), set);
        Ok(layout.restore(buffer))
    }

    /// Runs the active stages over an RGBA buffer.
    pub fn run_stages(&self, mut buffer: RgbaImage, set: &AdjustmentSet) -> RgbaImage {
        for stage in self.stages.iter().filter(|stage| stage.is_active(set)) {
            let value = set.get(stage.knob);
            log::debug!("Applying {} = {}", stage.name(), value);
            buffer = (stage.transform)(buffer, value);
        }
        buffer
    }
}
