//! Downsampling for the memory guard.
//!
//! Two-pass separable resize with a triangle (bilinear) kernel widened
//! by the scale factor, so downscales average over the full source
//! footprint instead of point-sampling. Quality-wise that is what a
//! guard shrink before a lossy encode needs; no other filters are
//! exposed.

use lutgrade_core::{Error, ImageBuf, Result, CHANNELS};

/// Resizes `src` to `dst_w` x `dst_h`.
pub fn resize(src: &ImageBuf, dst_w: u32, dst_h: u32) -> Result<ImageBuf> {
    if dst_w == 0 || dst_h == 0 {
        return Err(Error::invalid_dimensions(
            dst_w,
            dst_h,
            "resize target must be non-empty",
        ));
    }
    let src_w = src.width() as usize;
    let src_h = src.height() as usize;

    let temp = resize_axis(src.as_bytes(), src_w, src_h, dst_w as usize, Axis::X);
    let out = resize_axis(&temp, dst_w as usize, src_h, dst_h as usize, Axis::Y);
    ImageBuf::from_raw(dst_w, dst_h, out)
}

enum Axis {
    X,
    Y,
}

/// Triangle kernel weight at `x`, support 1.
#[inline]
fn triangle(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Resamples one axis, the other held fixed.
fn resize_axis(src: &[u8], src_w: usize, src_h: usize, dst_len: usize, axis: Axis) -> Vec<u8> {
    let (src_len, lines) = match axis {
        Axis::X => (src_w, src_h),
        Axis::Y => (src_h, src_w),
    };
    let (out_w, out_h) = match axis {
        Axis::X => (dst_len, src_h),
        Axis::Y => (src_w, dst_len),
    };
    let mut dst = vec![0u8; out_w * out_h * CHANNELS];

    let scale = src_len as f32 / dst_len as f32;
    let support = scale.max(1.0);

    for line in 0..lines {
        for d in 0..dst_len {
            let center = (d as f32 + 0.5) * scale - 0.5;
            let lo = ((center - support).floor().max(0.0)) as usize;
            let hi = (((center + support).ceil()) as usize).min(src_len - 1);

            let mut sum = [0.0f32; CHANNELS];
            let mut weight_sum = 0.0f32;
            for s in lo..=hi {
                let w = triangle((s as f32 - center) / support);
                if w == 0.0 {
                    continue;
                }
                weight_sum += w;
                let idx = match axis {
                    Axis::X => (line * src_w + s) * CHANNELS,
                    Axis::Y => (s * src_w + line) * CHANNELS,
                };
                for c in 0..CHANNELS {
                    sum[c] += src[idx + c] as f32 * w;
                }
            }

            let out_idx = match axis {
                Axis::X => (line * out_w + d) * CHANNELS,
                Axis::Y => (d * out_w + line) * CHANNELS,
            };
            if weight_sum > 0.0 {
                for c in 0..CHANNELS {
                    dst[out_idx + c] = (sum[c] / weight_sum + 0.5).clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    dst
}
