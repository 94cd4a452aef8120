//! Per-task grading parameters.

/// Dithering applied before re-quantizing graded values to 8 bits.
///
/// LUT grading tends to introduce banding in smooth gradients; dithering
/// perturbs values by less than one code step to break the bands up.
/// The choice never alters image dimensions or channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherType {
    /// Round to nearest, no perturbation.
    #[default]
    None,
    /// Deterministic 4x4 Bayer threshold pattern per pixel coordinate.
    Ordered,
    /// Independent per-pixel uniform noise bounded to half a code step.
    Random,
}

impl DitherType {
    /// Name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ordered => "ordered",
            Self::Random => "random",
        }
    }
}

/// Immutable parameters for one grading task.
///
/// A frozen copy is taken at submission; the scheduler never reads the
/// caller's value again after `submit` returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingParams {
    /// Primary LUT blend factor, 0.0 (no effect) to 1.0 (full look).
    pub strength: f32,
    /// Secondary LUT blend factor, meaningful only when a secondary LUT
    /// is loaded.
    pub lut2_strength: f32,
    /// Output encode quality, 0-100. Passed through to the encoder.
    pub quality: u8,
    /// Dithering applied before quantization.
    pub dither: DitherType,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            lut2_strength: 0.0,
            quality: 90,
            dither: DitherType::None,
        }
    }
}

impl ProcessingParams {
    /// Returns a copy with strengths clamped to [0, 1] and quality to 100.
    pub fn clamped(self) -> Self {
        Self {
            strength: self.strength.clamp(0.0, 1.0),
            lut2_strength: self.lut2_strength.clamp(0.0, 1.0),
            quality: self.quality.min(100),
            dither: self.dither,
        }
    }
}
