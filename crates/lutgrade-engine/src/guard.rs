//! Output memory guard.
//!
//! Encoding a very large graded image can exhaust memory in the encoder's
//! working set, so outputs pass through the guard before any lossy
//! encode. Images at or under the pixel ceiling pass through untouched;
//! larger ones are downsampled once, preserving aspect ratio, to the
//! largest size under the ceiling.

use crate::error::ProcessingResult;
use crate::resize;
use lutgrade_core::ImageBuf;
use tracing::info;

/// Default output ceiling: one hundred megapixels, around 400 MB of
/// RGBA8 plus encoder overhead.
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// A downsample the guard performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    /// Original dimensions.
    pub from: (u32, u32),
    /// Dimensions after the guard shrink.
    pub to: (u32, u32),
}

/// Caps output pixel count before encoding.
#[derive(Debug, Clone, Copy)]
pub struct MemoryGuard {
    ceiling: u64,
}

impl Default for MemoryGuard {
    fn default() -> Self {
        Self {
            ceiling: MAX_OUTPUT_PIXELS,
        }
    }
}

impl MemoryGuard {
    /// A guard with a custom pixel ceiling. A ceiling of zero is clamped
    /// to one pixel.
    pub fn with_ceiling(ceiling: u64) -> Self {
        Self {
            ceiling: ceiling.max(1),
        }
    }

    /// The active pixel ceiling.
    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Applies the guard.
    ///
    /// Returns the image unchanged (and no event) when it fits, otherwise
    /// the downsampled image plus the [`ResizeEvent`] describing what
    /// happened. Both target dimensions stay at least 1 no matter how
    /// extreme the aspect ratio.
    pub fn constrain(&self, image: ImageBuf) -> ProcessingResult<(ImageBuf, Option<ResizeEvent>)> {
        let pixels = image.pixel_count();
        if pixels <= self.ceiling {
            return Ok((image, None));
        }

        let scale = (self.ceiling as f64 / pixels as f64).sqrt();
        let mut w = ((image.width() as f64 * scale).floor() as u32).max(1);
        let mut h = ((image.height() as f64 * scale).floor() as u32).max(1);
        // Floating point can land a hair over; nudge the longer edge down.
        while w as u64 * h as u64 > self.ceiling {
            if w >= h && w > 1 {
                w -= 1;
            } else if h > 1 {
                h -= 1;
            } else {
                break;
            }
        }

        let event = ResizeEvent {
            from: (image.width(), image.height()),
            to: (w, h),
        };
        info!(
            from_w = event.from.0,
            from_h = event.from.1,
            to_w = w,
            to_h = h,
            "output over pixel ceiling, downsampling"
        );
        let shrunk = resize::resize(&image, w, h)?;
        Ok((shrunk, Some(event)))
    }
}
