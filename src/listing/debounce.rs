//! Search-as-you-type debounce.
//!
//! Times are offsets from page load, so a recorded session replays the same
//! way every time.

use std::time::Duration;

/// Holds back the search until the input has been quiet for `delay`.
///
/// Every keystroke re-arms the timer; only the last one in a quiet window
/// leads to a search run.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_input: Option<Duration>,
}

impl Debouncer {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_input: None,
        }
    }

    /// Record a keystroke at `at`, superseding any pending one.
    pub fn add(&mut self, at: Duration) {
        self.last_input = Some(at);
    }

    #[inline]
    pub const fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    /// Whether a pending run is due at `now`.
    pub fn ready(&self, now: Duration) -> bool {
        self.last_input
            .is_some_and(|t| now.saturating_sub(t) >= self.delay)
    }

    /// Disarm, returning whether a run was pending.
    pub fn take(&mut self) -> bool {
        self.last_input.take().is_some()
    }
}
