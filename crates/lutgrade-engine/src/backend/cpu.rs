//! Row-band CPU backend.

use super::{ProcessorBackend, ProcessorKind, RunHooks};
use crate::error::{ProcessingError, ProcessingResult};
use crate::params::ProcessingParams;
use crate::transform::grade_pixel;
use lutgrade_core::{ImageBuf, CHANNELS};
use lutgrade_lut::LutSnapshot;
use rayon::prelude::*;
use tracing::debug;

/// Rows per band. Cancellation and progress are observed between bands,
/// so the band height bounds both reaction latency and callback rate.
const BAND_ROWS: u32 = 64;

/// Always-available backend: sequential bands of rows, rows within a
/// band graded in parallel.
#[derive(Debug, Default)]
pub struct CpuProcessor;

impl CpuProcessor {
    /// Creates the CPU backend. Never fails.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessorBackend for CpuProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::Cpu
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
        let height = image.height();
        let row_bytes = image.row_bytes();
        let total_bands = height.div_ceil(BAND_ROWS).max(1);
        debug!(width, height, bands = total_bands, "cpu grade start");

        let mut out = ImageBuf::new(width, height)?;
        let src = image.as_bytes();
        let dst = out.as_bytes_mut();
        hooks.report(0, total_bands);

        for band in 0..total_bands {
            if hooks.cancelled() {
                return Err(ProcessingError::Cancelled);
            }
            let y0 = band * BAND_ROWS;
            let y1 = (y0 + BAND_ROWS).min(height);
            let lo = y0 as usize * row_bytes;
            let hi = y1 as usize * row_bytes;

            dst[lo..hi]
                .par_chunks_exact_mut(row_bytes)
                .zip(src[lo..hi].par_chunks_exact(row_bytes))
                .enumerate()
                .for_each(|(i, (drow, srow))| {
                    let y = y0 + i as u32;
                    for x in 0..width as usize {
                        let o = x * CHANNELS;
                        let px = [srow[o], srow[o + 1], srow[o + 2], srow[o + 3]];
                        let graded = grade_pixel(
                            px,
                            primary,
                            secondary,
                            &params,
                            x as u32,
                            y,
                            hooks.dither_seed,
                        );
                        drow[o..o + CHANNELS].copy_from_slice(&graded);
                    }
                });

            hooks.report(band + 1, total_bands);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ProcessingParams;
    use lutgrade_lut::Lut3D;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    fn snapshot_with_identity() -> LutSnapshot {
        LutSnapshot {
            primary: Some(Arc::new(Lut3D::identity(4))),
            secondary: None,
        }
    }

    #[test]
    fn test_identity_lut_roundtrip() {
        let mut image = ImageBuf::new(33, 70).unwrap();
        for y in 0..70 {
            for x in 0..33 {
                image
                    .set_pixel(x, y, [(x * 7) as u8, (y * 3) as u8, 128, 255])
                    .unwrap();
            }
        }
        let cancel = AtomicBool::new(false);
        let sink = |_p: super::super::Progress| {};
        let hooks = RunHooks {
            cancel: &cancel,
            progress: &sink,
            dither_seed: 1,
        };
        let out = CpuProcessor::new()
            .run(
                &image,
                &snapshot_with_identity(),
                &ProcessingParams::default(),
                &hooks,
            )
            .unwrap();
        assert_eq!(out.as_bytes(), image.as_bytes());
    }

    #[test]
    fn test_no_primary_fails_fast() {
        let image = ImageBuf::new(4, 4).unwrap();
        let cancel = AtomicBool::new(false);
        let sink = |_p: super::super::Progress| {};
        let hooks = RunHooks {
            cancel: &cancel,
            progress: &sink,
            dither_seed: 0,
        };
        let err = CpuProcessor::new()
            .run(
                &image,
                &LutSnapshot::default(),
                &ProcessingParams::default(),
                &hooks,
            )
            .unwrap_err();
        assert!(matches!(err, ProcessingError::NoLutLoaded));
    }

    #[test]
    fn test_pre_raised_cancel_yields_cancelled() {
        let image = ImageBuf::new(8, 8).unwrap();
        let cancel = AtomicBool::new(true);
        let sink = |_p: super::super::Progress| {};
        let hooks = RunHooks {
            cancel: &cancel,
            progress: &sink,
            dither_seed: 0,
        };
        let err = CpuProcessor::new()
            .run(
                &image,
                &snapshot_with_identity(),
                &ProcessingParams::default(),
                &hooks,
            )
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(cancel.load(Ordering::Relaxed));
    }

    #[test]
    fn test_progress_monotonic_and_terminal() {
        let image = ImageBuf::new(16, 200).unwrap();
        let seen: Mutex<Vec<(u32, u32)>> = Mutex::new(Vec::new());
        let sink = |p: super::super::Progress| {
            seen.lock().unwrap().push((p.completed, p.total));
        };
        let cancel = AtomicBool::new(false);
        let hooks = RunHooks {
            cancel: &cancel,
            progress: &sink,
            dither_seed: 0,
        };
        CpuProcessor::new()
            .run(
                &image,
                &snapshot_with_identity(),
                &ProcessingParams::default(),
                &hooks,
            )
            .unwrap();
        let seen = seen.into_inner().unwrap();
        assert!(seen.len() >= 2);
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
        let last = seen.last().unwrap();
        assert_eq!(last.0, last.1);
    }
}
