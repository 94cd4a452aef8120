//! Watermark compositing seam.
//!
//! Graded output can pass through a compositor before encoding. Text and
//! image watermark rendering live behind this trait; the engine itself
//! ships only the passthrough.

use crate::error::ProcessingResult;
use lutgrade_core::ImageBuf;

/// Composites a watermark over a graded image.
pub trait WatermarkCompositor: Send + Sync {
    /// Returns the image with the watermark applied.
    fn composite(&self, image: ImageBuf) -> ProcessingResult<ImageBuf>;
}

/// No-op compositor: the image goes out as graded.
#[derive(Debug, Default)]
pub struct PassthroughWatermark;

impl WatermarkCompositor for PassthroughWatermark {
    fn composite(&self, image: ImageBuf) -> ProcessingResult<ImageBuf> {
        Ok(image)
    }
}
