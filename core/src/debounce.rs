use std::time::{Duration, Instant};

/// Default quiet window before a suggestion query goes out.
pub const DEFAULT_QUERY_DELAY: Duration = Duration::from_millis(300);

/// Coalescing debounce over a rapidly changing value: every update cancels
/// the pending emission and reschedules one full delay later, so only the
/// last value of a burst is ever emitted, and nothing is emitted while
/// updates keep arriving. At most one emission is outstanding.
///
/// Time is injected rather than read, keeping the type synchronous and
/// deterministic; a driver polls it (or sleeps until [`deadline`]).
///
/// [`deadline`]: Debouncer::deadline
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet window from `now`.
    pub fn update(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Emit the pending value if its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// When the pending value becomes emittable, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_DELAY)
    }
}
