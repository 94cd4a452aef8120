//! Error types for grading tasks.
//!
//! Every failure of an accepted task is reported through the completion
//! sink, never thrown across the scheduling boundary.

use thiserror::Error;

/// Result type for grading operations.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Errors that can terminate a grading task.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// No primary LUT was loaded when the task ran.
    #[error("no LUT loaded")]
    NoLutLoaded,

    /// The requested processor backend could not be initialized.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The per-pixel transform failed.
    #[error("transform failed: {0}")]
    TransformFailed(#[from] lutgrade_core::Error),

    /// The task was cancelled cooperatively before completion.
    #[error("task cancelled")]
    Cancelled,
}

impl ProcessingError {
    /// Returns `true` for the cancellation terminal state.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
