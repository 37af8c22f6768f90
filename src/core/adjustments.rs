// pixtone/src/core/adjustments.rs
use super::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const KNOB_MIN: f32 = -100.0;
pub const KNOB_MAX: f32 = 100.0;

/// The ten adjustment knobs, declared in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Knob {
    Brightness,
    Exposure,
    Contrast,
    Highlights,
    Shadows,
    Vignette,
    Saturation,
    Warmth,
    Tint,
    Sharpness,
}

impl Knob {
    pub const ALL: [Knob; 10] = [
        Knob::Brightness,
        Knob::Exposure,
        Knob::Contrast,
        Knob::Highlights,
        Knob::Shadows,
        Knob::Vignette,
        Knob::Saturation,
        Knob::Warmth,
        Knob::Tint,
        Knob::Sharpness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Knob::Brightness => "brightness",
            Knob::Exposure => "exposure",
            Knob::Contrast => "contrast",
            Knob::Highlights => "highlights",
            Knob::Shadows => "shadows",
            Knob::Vignette => "vignette",
            Knob::Saturation => "saturation",
            Knob::Warmth => "warmth",
            Knob::Tint => "tint",
            Knob::Sharpness => "sharpness",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Knob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Knob {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Knob::ALL
            .into_iter()
            .find(|knob| knob.name() == lower)
            .ok_or(())
    }
}

/// Why a knob value was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum KnobViolation {
    OutOfRange { knob: Knob, value: f32 },
    NotFinite { knob: Knob, value: f32 },
    UnknownKnob(String),
    Unparsable { entry: String },
}

impl KnobViolation {
    pub fn knob(&self) -> Option<Knob> {
        match self {
            KnobViolation::OutOfRange { knob, .. } | KnobViolation::NotFinite { knob, .. } => {
                Some(*knob)
            }
            _ => None,
        }
    }
}

impl fmt::Display for KnobViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnobViolation::OutOfRange { knob, value } => write!(
                f,
                "{} = {} is outside [{}, {}]",
                knob, value, KNOB_MIN, KNOB_MAX
            ),
            KnobViolation::NotFinite { knob, value } => {
                write!(f, "{} = {} is not a finite number", knob, value)
            }
            KnobViolation::UnknownKnob(name) => write!(f, "unknown adjustment '{}'", name),
            KnobViolation::Unparsable { entry } => {
                write!(f, "expected name=value, got '{}'", entry)
            }
        }
    }
}

/// Unvalidated adjustment values as supplied by a caller.
///
/// Knobs left unset default to `0` when validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustmentInput {
    values: [Option<f32>; 10],
    rejected: Vec<KnobViolation>,
}

impl AdjustmentInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, knob: Knob, value: f32) -> Self {
        self.values[knob.index()] = Some(value);
        self
    }

    pub fn set_opt(self, knob: Knob, value: Option<f32>) -> Self {
        match value {
            Some(value) => self.set(knob, value),
            None => self,
        }
    }

    /// Parses a `name=value` pair such as `shadows=-30`.
    ///
    /// Malformed entries are remembered and reported together with range
    /// errors by [`AdjustmentInput::validate`].
    pub fn parse_pair(mut self, entry: &str) -> Self {
        let Some((name, raw)) = entry.split_once('=') else {
            self.rejected.push(KnobViolation::Unparsable {
                entry: entry.to_string(),
            });
            return self;
        };

        let Ok(knob) = name.parse::<Knob>() else {
            self.rejected
                .push(KnobViolation::UnknownKnob(name.trim().to_string()));
            return self;
        };

        match raw.trim().parse::<f32>() {
            Ok(value) => self.set(knob, value),
            Err(_) => {
                self.rejected.push(KnobViolation::Unparsable {
                    entry: entry.to_string(),
                });
                self
            }
        }
    }

    pub fn get(&self, knob: Knob) -> Option<f32> {
        self.values[knob.index()]
    }

    /// Checks every knob and returns all problems at once.
    pub fn validate(&self) -> Result<AdjustmentSet> {
        let mut violations = self.rejected.clone();
        let mut values = [0.0_f32; 10];

        for knob in Knob::ALL {
            let Some(value) = self.get(knob) else {
                continue;
            };

            if !value.is_finite() {
                violations.push(KnobViolation::NotFinite { knob, value });
            } else if !(KNOB_MIN..=KNOB_MAX).contains(&value) {
                violations.push(KnobViolation::OutOfRange { knob, value });
            } else {
                // Normalizes -0.0 so the skip guard sees an exact zero.
                values[knob.index()] = if value == 0.0 { 0.0 } else { value };
            }
        }

        if violations.is_empty() {
            Ok(AdjustmentSet { values })
        } else {
            Err(Error::InvalidAdjustment(violations))
        }
    }
}

/// A validated set of knob values, each finite and within `[-100, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdjustmentSet {
    values: [f32; 10],
}

impl AdjustmentSet {
    pub fn get(&self, knob: Knob) -> f32 {
        self.values[knob.index()]
    }

    pub fn is_identity(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn non_zero(&self) -> impl Iterator<Item = (Knob, f32)> + '_ {
        Knob::ALL
            .into_iter()
            .map(|knob| (knob, self.get(knob)))
            .filter(|(_, value)| *value != 0.0)
    }

    /// Returns a copy with one knob reset to zero.
    pub fn without(mut self, knob: Knob) -> Self {
        self.values[knob.index()] = 0.0;
        self
    }
}

impl fmt::Display for AdjustmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("(none)");
        }
        for (i, (knob, value)) in self.non_zero().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", knob, value)?;
        }
        Ok(())
    }
}
