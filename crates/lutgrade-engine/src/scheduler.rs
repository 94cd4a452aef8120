//! Single-flight task scheduler.
//!
//! At most one grading task runs at a time. [`Scheduler::submit`] returns
//! `false` without side effects while a task is in flight; the winning
//! submission snapshots the LUT store and resolves its backend up front,
//! then runs on a dedicated worker thread. Completion is delivered to the
//! `on_complete` sink exactly once per accepted task, cancelled or not.

use crate::backend::{self, EngineConfig, Progress, RunHooks};
use crate::error::ProcessingResult;
use lutgrade_core::ImageBuf;
use lutgrade_lut::{LutResult, LutStore};
use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// No task in flight; the next submission will be accepted.
    Idle,
    /// A task is in flight; submissions are rejected.
    Running,
}

/// Owns the LUT store and the single worker slot.
///
/// All methods take `&self`; the scheduler is meant to be shared behind
/// an `Arc` between the submitting side and whoever cancels or reloads.
pub struct Scheduler {
    store: Mutex<LutStore>,
    config: Mutex<EngineConfig>,
    running: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    next_seed: AtomicU64,
}

impl Scheduler {
    /// Creates an idle scheduler with an empty LUT store.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: Mutex::new(LutStore::new()),
            config: Mutex::new(config),
            running: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
            next_seed: AtomicU64::new(1),
        }
    }

    /// Loads the primary LUT. Safe while a task runs: the in-flight task
    /// keeps the snapshot it was submitted with.
    pub fn load_lut<R: Read>(&self, reader: R) -> LutResult<()> {
        self.store.lock().unwrap().load(reader)
    }

    /// Loads the secondary LUT; `Ok(false)` means the stream was unusable
    /// and grading continues single-LUT.
    pub fn load_secondary_lut<R: Read>(&self, reader: R) -> LutResult<bool> {
        self.store.lock().unwrap().load_secondary(reader)
    }

    /// Drops both LUTs. Tasks submitted afterwards complete with a
    /// no-LUT error.
    pub fn clear_luts(&self) {
        self.store.lock().unwrap().clear();
    }

    /// Whether a primary LUT is currently loaded.
    pub fn has_lut(&self) -> bool {
        self.store.lock().unwrap().primary().is_some()
    }

    /// Current state. `Idle` means the next [`submit`](Self::submit) wins.
    pub fn state(&self) -> TaskState {
        if self.running.load(Ordering::SeqCst) {
            TaskState::Running
        } else {
            TaskState::Idle
        }
    }

    /// Replaces the engine config. Takes effect at the next submission;
    /// a task already in flight keeps the backend it started with.
    pub fn set_config(&self, config: EngineConfig) {
        debug!(?config, "engine config replaced");
        *self.config.lock().unwrap() = config;
    }

    /// Resolves the processor descriptor for the next task under the
    /// current config. Never cached.
    pub fn processor_info(&self) -> crate::backend::ProcessorInfo {
        backend::resolve(&self.config.lock().unwrap())
    }

    /// Submits a grading task.
    ///
    /// Returns `false` without side effects when a task is already in
    /// flight. An accepted task snapshots the LUT store and resolves its
    /// backend immediately, then grades on a worker thread. `on_progress`
    /// observes non-decreasing progress; `on_complete` fires exactly once
    /// with the graded image, the cancellation error, or the failure.
    ///
    /// A submission with no primary LUT loaded is still accepted and
    /// completes with [`ProcessingError::NoLutLoaded`] through the sink,
    /// so callers have a single completion path to watch.
    ///
    /// [`ProcessingError::NoLutLoaded`]: crate::ProcessingError::NoLutLoaded
    pub fn submit<P, C>(
        &self,
        image: ImageBuf,
        params: crate::ProcessingParams,
        on_progress: P,
        on_complete: C,
    ) -> bool
    where
        P: Fn(Progress) + Send + Sync + 'static,
        C: FnOnce(ProcessingResult<ImageBuf>) + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("submission rejected, task already in flight");
            return false;
        }
        self.cancel.store(false, Ordering::SeqCst);

        // Snapshot everything the task needs before the worker starts, so
        // LUT reloads or config changes after this point cannot touch it.
        let luts = self.store.lock().unwrap().snapshot();
        let info = backend::resolve(&self.config.lock().unwrap());
        backend::log_resolved(&info);
        let seed = self.next_seed.fetch_add(1, Ordering::Relaxed);

        let running = Arc::clone(&self.running);
        let cancel = Arc::clone(&self.cancel);

        // Hold the slot across reap and spawn so it always names the most
        // recent worker. The previous worker has finished its task (the
        // slot was free), but when the sink resubmits, `submit` runs on
        // that worker thread itself and its handle must be dropped, not
        // self-joined.
        let mut slot = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = slot.take() {
            if old.thread().id() != std::thread::current().id() {
                let _ = old.join();
            }
        }
        *slot = Some(std::thread::spawn(move || {
            let result = backend::create(&info).and_then(|b| {
                let hooks = RunHooks {
                    cancel: &cancel,
                    progress: &on_progress,
                    dither_seed: seed,
                };
                b.run(&image, &luts, &params, &hooks)
            });
            match &result {
                Ok(out) => info!(width = out.width(), height = out.height(), "grade complete"),
                Err(e) if e.is_cancelled() => info!("grade cancelled"),
                Err(e) => warn!(error = %e, "grade failed"),
            }
            // Clear the single-flight flag before the sink runs, so a
            // completion handler may immediately resubmit.
            running.store(false, Ordering::SeqCst);
            on_complete(result);
        }));
        true
    }

    /// Requests cancellation of the in-flight task. Idempotent, and a
    /// no-op while idle. The task still completes through its sink, with
    /// a cancellation error.
    pub fn cancel(&self) {
        if self.running.load(Ordering::SeqCst) {
            debug!("cancellation requested");
            self.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Shuts the scheduler down: cancels any in-flight task, waits for
    /// the worker to finish, and drops the LUTs.
    pub fn release(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        // Runs from Drop too; recover the slot rather than unwrapping a
        // poisoned lock, and never join the current thread's own handle.
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = worker {
            if handle.thread().id() != std::thread::current().id() {
                let _ = handle.join();
            }
        }
        self.clear_luts();
        debug!("scheduler released");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.release();
    }
}
