//! The pure per-pixel color transform.
//!
//! One pixel in, one pixel out: normalize, sample the primary LUT, blend
//! by strength, optionally sample the secondary LUT at the blended
//! coordinate and blend again, dither, clamp, re-quantize. Alpha passes
//! through untouched. All intermediate math is f32.

use crate::dither;
use crate::params::ProcessingParams;
use lutgrade_core::Rgba8;
use lutgrade_lut::Lut3D;

/// Grades a single RGBA8 pixel.
///
/// `(x, y)` is the pixel coordinate, used only by the dither kernels;
/// `seed` individualizes random dithering per task.
#[inline]
pub fn grade_pixel(
    px: Rgba8,
    primary: &Lut3D,
    secondary: Option<&Lut3D>,
    params: &ProcessingParams,
    x: u32,
    y: u32,
    seed: u64,
) -> Rgba8 {
    let input = [
        px[0] as f32 / 255.0,
        px[1] as f32 / 255.0,
        px[2] as f32 / 255.0,
    ];

    let graded1 = primary.apply(input);

    let mut out = [0.0f32; 3];
    for i in 0..3 {
        out[i] = input[i] * (1.0 - params.strength) + graded1[i] * params.strength;
    }

    if let Some(lut2) = secondary {
        if params.lut2_strength > 0.0 {
            let graded2 = lut2.apply(out);
            for i in 0..3 {
                out[i] = out[i] * (1.0 - params.lut2_strength) + graded2[i] * params.lut2_strength;
            }
        }
    }

    let d = dither::offset(params.dither, x, y, seed);
    let mut result = px;
    for i in 0..3 {
        let v = (out[i].clamp(0.0, 1.0) * 255.0 + d + 0.5).floor();
        result[i] = v.clamp(0.0, 255.0) as u8;
    }
    // result[3] keeps the input alpha
    result
}
