//! Backend selection.
//!
//! [`resolve`] recomputes the processor descriptor from the current
//! config and probe state on every call; nothing is cached, so a config
//! change takes effect at the next task submission. [`create`] builds
//! the backend for a resolved descriptor and owns the fallback to CPU
//! when the accelerated path turns out unusable after all.

use super::{accel, AcceleratedProcessor, CpuProcessor, ProcessorBackend, ProcessorInfo, ProcessorKind};
use crate::error::ProcessingResult;
use std::thread::available_parallelism;
use tracing::{debug, warn};

/// Which backend the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorPreference {
    /// Accelerated when available, CPU otherwise.
    #[default]
    Auto,
    /// Always the CPU path.
    Cpu,
    /// Accelerated, falling back to CPU when unavailable.
    Accelerated,
}

/// Engine-wide settings. Changing these between tasks re-resolves the
/// backend; a task already running keeps the backend it started with.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// Requested backend.
    pub preference: ProcessorPreference,
    /// Skips the capability probe entirely, forcing the probe to report
    /// unavailable. Exists so fallback paths stay testable on machines
    /// where the probe would succeed.
    pub disable_accelerated: bool,
}

/// Resolves the descriptor for the next task under `config`.
pub fn resolve(config: &EngineConfig) -> ProcessorInfo {
    let available = !config.disable_accelerated && accel::probe().is_ok();
    let preferred = match config.preference {
        ProcessorPreference::Cpu => ProcessorKind::Cpu,
        ProcessorPreference::Auto | ProcessorPreference::Accelerated => {
            if available {
                ProcessorKind::Accelerated
            } else {
                if config.preference == ProcessorPreference::Accelerated {
                    warn!("accelerated backend requested but unavailable, using cpu");
                }
                ProcessorKind::Cpu
            }
        }
    };
    ProcessorInfo {
        preferred,
        accelerated_available: available,
        threads: available_parallelism().map(usize::from).unwrap_or(1),
    }
}

/// Builds the backend `info` points at.
///
/// When accelerated construction fails despite the earlier probe, the
/// task proceeds on the CPU path instead of failing.
pub fn create(info: &ProcessorInfo) -> ProcessingResult<Box<dyn ProcessorBackend>> {
    match info.preferred {
        ProcessorKind::Cpu => Ok(Box::new(CpuProcessor::new())),
        ProcessorKind::Accelerated => match AcceleratedProcessor::new() {
            Ok(backend) => Ok(Box::new(backend)),
            Err(e) => {
                warn!(error = %e, "accelerated backend failed to start, using cpu");
                Ok(Box::new(CpuProcessor::new()))
            }
        },
    }
}

/// Logs the resolved descriptor at debug level.
pub(crate) fn log_resolved(info: &ProcessorInfo) {
    debug!(
        backend = info.preferred.name(),
        accelerated_available = info.accelerated_available,
        threads = info.threads,
        "processor resolved"
    );
}
