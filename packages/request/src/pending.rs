//! In-flight request counter driving a global loading indicator.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A global progress indicator.
pub trait LoadingIndicator: Send + Sync {
    /// Shows the indicator.
    fn show(&self);
    /// Hides the indicator.
    fn hide(&self);
}

/// Indicator that does nothing, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIndicator;

impl LoadingIndicator for NullIndicator {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Counts requests between dispatch and settle.
///
/// Every [`begin`](Self::begin) returns a [`PendingGuard`] that decrements
/// the counter exactly once when dropped, whichever way the request ends.
/// Count changes and the indicator calls they trigger happen under one
/// lock, so the indicator is never hidden while a request is in flight.
pub struct PendingRequests {
    count: Mutex<usize>,
    indicator: Box<dyn LoadingIndicator>,
}

impl std::fmt::Debug for PendingRequests {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequests")
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new(Box::new(NullIndicator))
    }
}

impl PendingRequests {
    /// Creates a counter at zero.
    #[must_use]
    pub fn new(indicator: Box<dyn LoadingIndicator>) -> Self {
        Self {
            count: Mutex::new(0),
            indicator,
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests currently in flight.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.lock()
    }

    /// Registers a dispatched request. The indicator is shown unless
    /// `hide_loading_progress` is set.
    pub fn begin(&self, hide_loading_progress: bool) -> PendingGuard<'_> {
        let mut count = self.lock();
        *count += 1;
        log::trace!("Request dispatched ({} pending)", *count);
        if !hide_loading_progress {
            self.indicator.show();
        }
        drop(count);
        PendingGuard { owner: self }
    }

    fn finish(&self) {
        let mut count = self.lock();
        if *count == 0 {
            log::warn!("Pending request counter released below zero");
        } else {
            *count -= 1;
        }
        if *count == 0 {
            self.indicator.hide();
        }
    }
}

/// Releases one pending request on drop.
#[must_use = "dropping the guard immediately settles the request"]
pub struct PendingGuard<'a> {
    owner: &'a PendingRequests,
}

impl std::fmt::Debug for PendingGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingGuard").finish_non_exhaustive()
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.owner.finish();
    }
}
