//! Chunk-dispatch accelerated backend.
//!
//! Grades the image as a flat pixel stream in fixed-size dispatch
//! groups, each group fanned out across all worker lanes at once.
//! Construction probes for enough lanes to make the wide dispatch pay
//! off; when the probe fails the selector falls back to the CPU path.

use super::{ProcessorBackend, ProcessorKind, RunHooks};
use crate::error::{ProcessingError, ProcessingResult};
use crate::params::ProcessingParams;
use crate::transform::grade_pixel;
use lutgrade_core::{ImageBuf, CHANNELS};
use lutgrade_lut::LutSnapshot;
use rayon::prelude::*;
use std::thread::available_parallelism;
use tracing::debug;

/// Pixels per dispatch group. Cancellation and progress are observed on
/// group boundaries.
const GROUP_PIXELS: usize = 1 << 16;

/// Minimum worker lanes for the wide dispatch to beat the row-band path.
const MIN_LANES: usize = 4;

/// Wide-dispatch backend. Construct with [`AcceleratedProcessor::new`],
/// which runs the capability probe.
#[derive(Debug)]
pub struct AcceleratedProcessor {
    lanes: usize,
}

impl AcceleratedProcessor {
    /// Probes capability and builds the backend.
    ///
    /// Fails with [`ProcessingError::BackendUnavailable`] on machines
    /// without enough worker lanes.
    pub fn new() -> ProcessingResult<Self> {
        let lanes = probe()?;
        debug!(lanes, "accelerated backend ready");
        Ok(Self { lanes })
    }

    /// Worker lanes the probe found.
    pub fn lanes(&self) -> usize {
        self.lanes
    }
}

/// Capability probe: lane count, or why the accelerated path is unusable.
pub(super) fn probe() -> ProcessingResult<usize> {
    let lanes = available_parallelism().map(usize::from).unwrap_or(1);
    if lanes < MIN_LANES {
        return Err(ProcessingError::BackendUnavailable(format!(
            "{lanes} worker lanes available, wide dispatch needs {MIN_LANES}"
        )));
    }
    Ok(lanes)
}

impl ProcessorBackend for AcceleratedProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Accelerated
    }

    fn run(
        &self,
        image: &ImageBuf,
        luts: &LutSnapshot,
        params: &ProcessingParams,
        hooks: &RunHooks<'_>,
    ) -> ProcessingResult<ImageBuf> {
        let primary = luts.primary.as_deref().ok_or(ProcessingError::NoLutLoaded)?;
        let secondary = luts.secondary.as_deref();
        let params = params.clamped();

        let width = image.width();
        let pixels = image.pixel_count() as usize;
        let total_groups = (pixels.div_ceil(GROUP_PIXELS).max(1)) as u32;
        debug!(pixels, groups = total_groups, "accelerated grade start");

        let mut out = ImageBuf::new(width, image.height())?;
        let src = image.as_bytes();
        let dst = out.as_bytes_mut();
        hooks.report(0, total_groups);

        for group in 0..total_groups {
            if hooks.cancelled() {
                return Err(ProcessingError::Cancelled);
            }
            let base = group as usize * GROUP_PIXELS;
            let end = (base + GROUP_PIXELS).min(pixels);
            let lo = base * CHANNELS;
            let hi = end * CHANNELS;

            dst[lo..hi]
                .par_chunks_exact_mut(CHANNELS)
                .zip(src[lo..hi].par_chunks_exact(CHANNELS))
                .enumerate()
                .for_each(|(i, (dpx, spx))| {
                    let idx = (base + i) as u32;
                    let x = idx % width;
                    let y = idx / width;
                    let px = [spx[0], spx[1], spx[2], spx[3]];
                    let graded =
                        grade_pixel(px, primary, secondary, &params, x, y, hooks.dither_seed);
                    dpx.copy_from_slice(&graded);
                });

            hooks.report(group + 1, total_groups);
        }

        Ok(out)
    }
}
