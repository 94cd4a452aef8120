//! Processor backends.
//!
//! Two interchangeable execution strategies implement one capability:
//! apply the color transform across an entire image, reporting progress
//! and honoring cooperative cancellation.
//!
//! - [`CpuProcessor`] - row bands, always available.
//! - [`AcceleratedProcessor`] - fixed-size dispatch chunks; construction
//!   probes capability and can fail.
//!
//! The selector ([`resolve`] / [`create`]) decides which backend a task
//! uses and owns the fallback from accelerated to CPU; backends never
//! fall back themselves.

mod accel;
mod cpu;
mod select;

pub use accel::AcceleratedProcessor;
pub use cpu::CpuProcessor;
pub use select::{create, resolve, EngineConfig, ProcessorPreference};
pub(crate) use select::log_resolved;

use crate::error::ProcessingResult;
use crate::params::ProcessingParams;
use lutgrade_core::ImageBuf;
use lutgrade_lut::LutSnapshot;
use std::sync::atomic::{AtomicBool, Ordering};

/// Which execution strategy a backend implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorKind {
    /// Deterministic row-band CPU path.
    Cpu,
    /// Chunk-dispatch accelerated path.
    Accelerated,
}

impl ProcessorKind {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Accelerated => "accelerated",
        }
    }
}

/// Resolved processor descriptor.
///
/// Recomputed on every query; never cached beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorInfo {
    /// The backend the next task will use.
    pub preferred: ProcessorKind,
    /// Whether the accelerated path passed its capability probe.
    pub accelerated_available: bool,
    /// Worker lanes available to either path.
    pub threads: usize,
}

/// Structured task progress: completed work units out of a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Work units finished so far.
    pub completed: u32,
    /// Total work units for this task.
    pub total: u32,
}

impl Progress {
    /// Progress as a percentage in [0, 100].
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f32 * 100.0 / self.total as f32
        }
    }
}

/// Cancellation flag and progress sink handed to a running backend.
pub struct RunHooks<'a> {
    /// Cooperative cancellation flag, checked between bands/chunks.
    pub cancel: &'a AtomicBool,
    /// Progress sink; calls are monotonic non-decreasing per task.
    pub progress: &'a (dyn Fn(Progress) + Sync),
    /// Seed individualizing random dithering for this task.
    pub dither_seed: u64,
}

impl RunHooks<'_> {
    /// Whether cancellation has been requested.
    #[inline]
    pub fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Reports `completed` of `total` work units.
    #[inline]
    pub fn report(&self, completed: u32, total: u32) {
        (self.progress)(Progress { completed, total });
    }
}

/// An execution strategy applying the color transform to a whole image.
pub trait ProcessorBackend: Send {
    /// Which strategy this is.
    fn kind(&self) -> ProcessorKind;

    /// Grades `image` through the snapshot's LUTs.
    ///
    /// Fails fast with [`ProcessingError::NoLutLoaded`] when the snapshot
    /// has no primary, and returns
    /// [`ProcessingError::Cancelled`] instead of a partial result when the
    /// hook flag is raised mid-run.
    ///
    /// [`ProcessingError::NoLutLoaded`]: crate::ProcessingError::NoLutLoaded
    /// [`ProcessingError::Cancelled`]: crate::ProcessingError::Cancelled
    fn run(
        &self,
        image: &ImageBuf,
        luts: &LutSnapshot,
        params: &ProcessingParams,
        hooks: &RunHooks<'_>,
    ) -> ProcessingResult<ImageBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        let p = Progress {
            completed: 3,
            total: 12,
        };
        assert!((p.percent() - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_percent_zero_total() {
        let p = Progress {
            completed: 0,
            total: 0,
        };
        assert_eq!(p.percent(), 100.0);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ProcessorKind::Cpu.name(), "cpu");
        assert_eq!(ProcessorKind::Accelerated.name(), "accelerated");
    }
}
