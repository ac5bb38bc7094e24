//! Trailing-edge coalescing for pointer-move bursts.

/// Coalesces a stream of guide-line offsets to at most one application per
/// interval.
///
/// Applying every pointer-move during a fast drag is wasted work, so offers
/// inside the interval are deferred rather than applied. The newest deferred
/// offset is kept pending and released by [`Self::tick`] once the interval
/// has elapsed, so the last event of a burst is never dropped. This is a
/// rendering-cost bound, not a correctness mechanism: the terminating
/// pointer-up goes around the coalescer entirely.
#[derive(Clone, Debug)]
pub struct MoveCoalescer {
    interval: f64,
    last_applied: Option<f64>,
    pending: Option<f32>,
}

impl MoveCoalescer {
    /// `interval` is in seconds of the host clock.
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_applied: None,
            pending: None,
        }
    }

    /// Offer a new offset at time `now`.
    ///
    /// Returns the offset to apply immediately, or `None` if it was deferred
    /// to a later [`Self::tick`].
    pub fn offer(&mut self, offset: f32, now: f64) -> Option<f32> {
        if self.last_applied.is_none_or(|t| now - t >= self.interval) {
            self.last_applied = Some(now);
            self.pending = None;
            Some(offset)
        } else {
            self.pending = Some(offset);
            None
        }
    }

    /// Release the pending offset once the interval has elapsed.
    pub fn tick(&mut self, now: f64) -> Option<f32> {
        if self.pending.is_some() && self.last_applied.is_none_or(|t| now - t >= self.interval) {
            self.last_applied = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Is an offer waiting for [`Self::tick`]?
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget all timing state, e.g. between drag sessions.
    pub fn reset(&mut self) {
        self.last_applied = None;
        self.pending = None;
    }
}
