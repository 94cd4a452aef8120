//! Dither kernels.
//!
//! Both kernels produce a per-pixel offset in units of one 8-bit code
//! step, bounded to (-0.5, 0.5), added to the graded value just before
//! quantization:
//!
//! - **Ordered**: the standard 4x4 Bayer threshold matrix, deterministic
//!   per pixel coordinate.
//! - **Random**: uniform noise from a splitmix64-style hash of the pixel
//!   coordinate and a per-task seed, so bands can run in parallel without
//!   a shared generator.

use crate::params::DitherType;

/// 4x4 Bayer matrix, values 0..16, row-major.
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Returns the dither offset for pixel `(x, y)` in LSB units.
///
/// `seed` individualizes the random kernel per task; the other kernels
/// ignore it.
#[inline]
pub fn offset(dither: DitherType, x: u32, y: u32, seed: u64) -> f32 {
    match dither {
        DitherType::None => 0.0,
        DitherType::Ordered => {
            let t = BAYER_4X4[(y & 3) as usize][(x & 3) as usize] as f32;
            // Center the 0..16 thresholds on zero: (-0.5, 0.5)
            (t + 0.5) / 16.0 - 0.5
        }
        DitherType::Random => {
            let mut h = seed
                ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
                ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
            h ^= h >> 30;
            h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
            h ^= h >> 27;
            h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
            h ^= h >> 31;
            // Map to (-0.5, 0.5)
            (h >> 40) as f32 / (1u64 << 24) as f32 - 0.5
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_zero() {
        for (x, y) in [(0, 0), (1, 7), (123, 456)] {
            assert_eq!(offset(DitherType::None, x, y, 42), 0.0);
        }
    }

    #[test]
    fn test_ordered_bounded_and_deterministic() {
        for y in 0..8 {
            for x in 0..8 {
                let a = offset(DitherType::Ordered, x, y, 0);
                let b = offset(DitherType::Ordered, x, y, 99);
                assert_eq!(a, b, "ordered must ignore the seed");
                assert!(a > -0.5 && a < 0.5, "offset {a} out of bounds");
            }
        }
    }

    #[test]
    fn test_ordered_repeats_every_four() {
        let a = offset(DitherType::Ordered, 1, 2, 0);
        let b = offset(DitherType::Ordered, 5, 6, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ordered_zero_mean() {
        let sum: f32 = (0..4)
            .flat_map(|y| (0..4).map(move |x| offset(DitherType::Ordered, x, y, 0)))
            .sum();
        assert!(sum.abs() < 1e-5);
    }

    #[test]
    fn test_random_bounded() {
        for y in 0..32 {
            for x in 0..32 {
                let v = offset(DitherType::Random, x, y, 7);
                assert!(v >= -0.5 && v <= 0.5, "offset {v} out of bounds");
            }
        }
    }

    #[test]
    fn test_random_varies_with_seed() {
        let a = offset(DitherType::Random, 10, 10, 1);
        let b = offset(DitherType::Random, 10, 10, 2);
        assert_ne!(a, b);
    }
}
