//! Progress reporting for long-running algorithms.
//!
//! The relaxation loop can run for hundreds of iterations on fine meshes.
//! Callers that want feedback pass a [`Progress`] callback, which receives
//! the current iteration, the iteration cap, and a short message.
//!
//! # Example
//!
//! ```
//! use distmesh::algo::Progress;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let progress = Progress::new(move |_current, _total, _message| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! });
//!
//! progress.report(0, 10, "Relaxing");
//! assert_eq!(calls.load(Ordering::Relaxed), 1);
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Current step (0-based)
/// - `total`: Upper bound on the number of steps
/// - `message`: Description of the current operation
///
/// Iterative algorithms may finish before `current` reaches `total`; a
/// final report with `current == total` is always sent on completion.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
