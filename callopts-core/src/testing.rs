//! Test doubles for time-dependent code.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::ticker::Ticker;
use crate::unit::TimeUnit;

/// A [`Ticker`] that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle to advance
/// time while deadlines hold another.
///
/// # Example
///
/// ```
/// use callopts_core::testing::FakeTicker;
/// use callopts_core::{Deadline, TimeUnit};
///
/// let ticker = FakeTicker::new();
/// let deadline = Deadline::after_with_ticker(10, TimeUnit::Seconds, ticker.shared());
/// assert!(!deadline.is_expired());
///
/// ticker.forward(10, TimeUnit::Seconds);
/// assert!(deadline.is_expired());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FakeTicker {
    inner: Arc<FakeTickerInner>,
}

#[derive(Debug, Default)]
struct FakeTickerInner {
    nanos: AtomicI64,
}

impl Ticker for FakeTickerInner {
    fn read(&self) -> i64 {
        self.nanos.load(Ordering::SeqCst)
    }
}

impl FakeTicker {
    /// Create a ticker reading zero.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a ticker with the given initial reading.
    pub fn starting_at(nanos: i64) -> Self {
        Self {
            inner: Arc::new(FakeTickerInner {
                nanos: AtomicI64::new(nanos),
            }),
        }
    }

    /// The ticker handle to give to deadlines.
    ///
    /// Every call returns the same `Arc`, so deadlines built from it compare
    /// against each other.
    pub fn shared(&self) -> Arc<dyn Ticker> {
        Arc::clone(&self.inner) as Arc<dyn Ticker>
    }

    /// Current reading.
    pub fn read(&self) -> i64 {
        self.inner.nanos.load(Ordering::SeqCst)
    }

    /// Advance by `nanos` nanoseconds. Negative values move time backwards.
    pub fn forward_nanos(&self, nanos: i64) {
        let _ = self
            .inner
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(nanos))
            });
    }

    /// Advance by `amount` of `unit`.
    pub fn forward(&self, amount: i64, unit: TimeUnit) {
        self.forward_nanos(unit.to_nanos(amount));
    }

    /// Advance by a [`Duration`].
    pub fn forward_duration(&self, duration: Duration) {
        self.forward_nanos(i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX));
    }
}
