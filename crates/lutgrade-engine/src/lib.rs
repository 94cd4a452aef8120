//! # lutgrade-engine
//!
//! The color grading engine: dual-LUT pixel transform with dithering,
//! interchangeable processor backends (CPU / accelerated), a single-flight
//! task scheduler with progress and cancellation, and a memory guard that
//! keeps outputs under a safe pixel budget.
//!
//! # Architecture
//!
//! ```text
//! Scheduler (single-flight, worker thread)
//!     |
//!     +-- Selector ----> ProcessorInfo { Cpu | Accelerated }
//!     |
//!     +-- ProcessorBackend::run(image, luts, params, hooks)
//!     |       +-- CpuProcessor          (row bands, rayon)
//!     |       +-- AcceleratedProcessor  (dispatch chunks)
//!     |
//!     +-- grade_pixel() per pixel  (normalize -> LUT1 -> blend ->
//!     |                             LUT2 -> blend -> dither -> quantize)
//!     |
//!     +-- on_progress / on_complete sinks
//! ```
//!
//! The memory guard ([`guard`]) runs outside the scheduler, after grading
//! and before any lossy encode.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lutgrade_core::ImageBuf;
//! use lutgrade_engine::{EngineConfig, ProcessingParams, Scheduler};
//! use std::sync::Arc;
//!
//! let scheduler = Arc::new(Scheduler::new(EngineConfig::default()));
//! scheduler.load_lut("look.cube file bytes".as_bytes()).ok();
//!
//! let image = ImageBuf::new(1920, 1080).unwrap();
//! let accepted = scheduler.submit(
//!     image,
//!     ProcessingParams::default(),
//!     |p| eprintln!("{}/{}", p.completed, p.total),
//!     |result| { let _ = result; },
//! );
//! assert!(accepted);
//! scheduler.release();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod params;
mod scheduler;
pub mod backend;
pub mod dither;
pub mod guard;
pub mod resize;
pub mod transform;
pub mod watermark;

pub use backend::{
    EngineConfig, ProcessorBackend, ProcessorInfo, ProcessorKind, ProcessorPreference, Progress,
};
pub use error::{ProcessingError, ProcessingResult};
pub use guard::{MemoryGuard, ResizeEvent, MAX_OUTPUT_PIXELS};
pub use params::{DitherType, ProcessingParams};
pub use scheduler::{Scheduler, TaskState};
pub use watermark::{PassthroughWatermark, WatermarkCompositor};
