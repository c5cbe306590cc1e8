//! Progress reporting for multi-page scrapes.
//!
//! Adapters and the contract-detail batch report through
//! [`ProgressCallback`] so they stay independent of how progress is shown.
//! Binaries plug in progress bars; libraries and tests use
//! [`NullProgress`].

/// Receives progress updates from a long-running scrape.
pub trait ProgressCallback: Send + Sync {
    /// Sets the number of pages expected.
    fn set_total(&self, total: u64);

    /// Advances by `delta` pages.
    fn inc(&self, delta: u64);

    /// Replaces the status message (usually the current team or player).
    fn set_message(&self, msg: String);

    /// Marks the scrape as finished.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
