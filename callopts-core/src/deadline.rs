//! Monotonic deadlines.
//!
//! A [`Deadline`] is an absolute instant on a [`Ticker`]'s time basis. It is
//! immutable once built; expiry is a pure function of the ticker's current
//! reading, polled through [`Deadline::is_expired`]. Acting on expiry is left
//! to whoever holds the deadline (usually the transport).
//!
//! # Example
//!
//! ```
//! use callopts_core::{Deadline, TimeUnit};
//!
//! let deadline = Deadline::after(5, TimeUnit::Seconds);
//! assert!(!deadline.is_expired());
//! assert!(deadline.time_remaining(TimeUnit::Milliseconds) <= 5_000);
//!
//! // Zero and negative durations are already expired.
//! assert!(Deadline::after(0, TimeUnit::Seconds).is_expired());
//! assert!(Deadline::after(-1, TimeUnit::Seconds).is_expired());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::ticker::{SystemTicker, Ticker, TickerRef, nano_time, same_ticker};
use crate::unit::TimeUnit;

/// Limits used when a deadline is carried over the wire.
pub mod defaults {
    /// Header name for the Connect protocol timeout.
    pub const CONNECT_TIMEOUT_HEADER: &str = "connect-timeout-ms";

    /// Maximum timeout value in milliseconds (10 digits = 9,999,999,999 ms ≈ 115 days).
    /// Longer timeouts are not sent at all.
    pub const MAX_TIMEOUT_MS: i64 = 9_999_999_999;
}

/// An absolute point in monotonic time after which an operation is expired.
///
/// Deadlines built from the same ticker compare with `==`, `<` and friends.
/// Deadlines from different tickers are incomparable through those operators
/// (`partial_cmp` returns `None`); use [`is_before`](Self::is_before),
/// [`minimum`](Self::minimum) or [`is_within`](Self::is_within), which
/// normalize both sides to their remaining time.
#[derive(Clone)]
pub struct Deadline {
    ticker: Arc<dyn Ticker>,
    deadline_nanos: i64,
}

impl Deadline {
    /// A deadline `amount` of `unit` from now on the system ticker.
    pub fn after(amount: i64, unit: TimeUnit) -> Self {
        Self::after_with_ticker(amount, unit, SystemTicker::shared())
    }

    /// A deadline `amount` of `unit` from the current reading of `ticker`.
    ///
    /// The expiration instant saturates at `i64::MAX` instead of wrapping, so
    /// a huge duration yields a deadline that never expires in practice.
    pub fn after_with_ticker(amount: i64, unit: TimeUnit, ticker: Arc<dyn Ticker>) -> Self {
        let offset = unit.to_nanos(amount);
        let deadline_nanos = ticker.read().saturating_add(offset);
        Self {
            ticker,
            deadline_nanos,
        }
    }

    /// A deadline `duration` from now on the system ticker.
    pub fn after_duration(duration: Duration) -> Self {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        Self::after(nanos, TimeUnit::Nanoseconds)
    }

    /// Build a deadline from a raw [`nano_time`] reading.
    pub fn from_nano_time(nano_time: i64) -> Self {
        Self {
            ticker: SystemTicker::shared(),
            deadline_nanos: nano_time,
        }
    }

    /// The expiration instant as a raw [`nano_time`] reading.
    ///
    /// Exact for system-ticker deadlines. For other tickers the remaining
    /// time is re-based onto the system ticker.
    pub fn nano_time(&self) -> i64 {
        if same_ticker(&self.ticker, &SystemTicker::shared()) {
            self.deadline_nanos
        } else {
            nano_time().saturating_add(self.remaining_nanos())
        }
    }

    /// The ticker this deadline reads time from.
    pub fn ticker(&self) -> &Arc<dyn Ticker> {
        &self.ticker
    }

    /// Whether the ticker has reached the expiration instant.
    pub fn is_expired(&self) -> bool {
        self.ticker.read() >= self.deadline_nanos
    }

    /// Time left before expiry, negative once expired, truncated to `unit`.
    pub fn time_remaining(&self, unit: TimeUnit) -> i64 {
        unit.from_nanos(self.remaining_nanos())
    }

    /// A deadline shifted by `amount` of `unit` on the same ticker.
    pub fn offset(&self, amount: i64, unit: TimeUnit) -> Self {
        if amount == 0 {
            return self.clone();
        }
        Self {
            ticker: Arc::clone(&self.ticker),
            deadline_nanos: self.deadline_nanos.saturating_add(unit.to_nanos(amount)),
        }
    }

    /// Whether this deadline expires strictly before `other`.
    pub fn is_before(&self, other: &Deadline) -> bool {
        self.cmp_normalized(other) == Ordering::Less
    }

    /// The earlier of the two deadlines.
    pub fn minimum(&self, other: &Deadline) -> Deadline {
        if self.is_before(other) {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Whether the two deadlines are at most `tolerance` apart.
    pub fn is_within(&self, tolerance: Duration, other: &Deadline) -> bool {
        let diff = if same_ticker(&self.ticker, &other.ticker) {
            self.deadline_nanos.abs_diff(other.deadline_nanos)
        } else {
            self.remaining_nanos().abs_diff(other.remaining_nanos())
        };
        u128::from(diff) <= tolerance.as_nanos()
    }

    /// Remaining time as a `Connect-Timeout-Ms` header value.
    ///
    /// Rounds up to whole milliseconds. Returns `None` once expired or when
    /// the remaining time needs more than 10 digits.
    pub fn timeout_header(&self) -> Option<String> {
        let nanos = self.remaining_nanos();
        if nanos <= 0 {
            return None;
        }
        let millis = nanos / 1_000_000 + i64::from(nanos % 1_000_000 != 0);
        if millis > defaults::MAX_TIMEOUT_MS {
            return None;
        }
        Some(millis.to_string())
    }

    fn remaining_nanos(&self) -> i64 {
        self.deadline_nanos.saturating_sub(self.ticker.read())
    }

    fn cmp_normalized(&self, other: &Deadline) -> Ordering {
        if same_ticker(&self.ticker, &other.ticker) {
            self.deadline_nanos.cmp(&other.deadline_nanos)
        } else {
            self.remaining_nanos().cmp(&other.remaining_nanos())
        }
    }
}

impl PartialEq for Deadline {
    fn eq(&self, other: &Self) -> bool {
        same_ticker(&self.ticker, &other.ticker) && self.deadline_nanos == other.deadline_nanos
    }
}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        same_ticker(&self.ticker, &other.ticker)
            .then(|| self.deadline_nanos.cmp(&other.deadline_nanos))
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ns from now", self.remaining_nanos())
    }
}

impl fmt::Debug for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deadline")
            .field("deadline_nanos", &self.deadline_nanos)
            .field("ticker", &TickerRef(&self.ticker))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTicker;

    #[test]
    fn test_after_uses_ticker_reading() {
        let ticker = FakeTicker::starting_at(1_000);
        let deadline = Deadline::after_with_ticker(5, TimeUnit::Microseconds, ticker.shared());
        assert_eq!(deadline.time_remaining(TimeUnit::Nanoseconds), 5_000);
        assert!(!deadline.is_expired());
    }

    #[test]
    fn test_expires_exactly_at_instant() {
        let ticker = FakeTicker::new();
        let deadline = Deadline::after_with_ticker(10, TimeUnit::Nanoseconds, ticker.shared());

        ticker.forward_nanos(9);
        assert!(!deadline.is_expired());
        ticker.forward_nanos(1);
        assert!(deadline.is_expired());
        assert_eq!(deadline.time_remaining(TimeUnit::Nanoseconds), 0);
        ticker.forward_nanos(5);
        assert_eq!(deadline.time_remaining(TimeUnit::Nanoseconds), -5);
    }

    #[test]
    fn test_zero_and_negative_durations_are_expired() {
        let ticker = FakeTicker::new();
        assert!(Deadline::after_with_ticker(0, TimeUnit::Seconds, ticker.shared()).is_expired());
        let past = Deadline::after_with_ticker(-3, TimeUnit::Seconds, ticker.shared());
        assert!(past.is_expired());
        assert_eq!(past.time_remaining(TimeUnit::Seconds), -3);
    }

    #[test]
    fn test_overflow_saturates() {
        let ticker = FakeTicker::starting_at(i64::MAX / 2);
        let deadline = Deadline::after_with_ticker(i64::MAX, TimeUnit::Days, ticker.shared());
        assert!(!deadline.is_expired());
        assert!(deadline.time_remaining(TimeUnit::Nanoseconds) > 0);
        assert_eq!(deadline.deadline_nanos, i64::MAX);

        let shifted = deadline.offset(1, TimeUnit::Days);
        assert_eq!(shifted.deadline_nanos, i64::MAX);
    }

    #[test]
    fn test_offset_and_ordering_on_same_ticker() {
        let ticker = FakeTicker::new();
        let base = Deadline::after_with_ticker(1, TimeUnit::Seconds, ticker.shared());
        let later = base.offset(1, TimeUnit::Seconds);
        let earlier = base.offset(-1, TimeUnit::Milliseconds);

        assert!(earlier < base);
        assert!(base < later);
        assert!(earlier.is_before(&later));
        assert_eq!(later.minimum(&earlier), earlier);
        assert_eq!(base.offset(0, TimeUnit::Hours), base);
    }

    #[test]
    fn test_different_tickers_are_not_comparable_by_operator() {
        let a = FakeTicker::new();
        let b = FakeTicker::new();
        let da = Deadline::after_with_ticker(1, TimeUnit::Seconds, a.shared());
        let db = Deadline::after_with_ticker(1, TimeUnit::Seconds, b.shared());

        assert_ne!(da, db);
        assert_eq!(da.partial_cmp(&db), None);
        assert!(da.is_within(Duration::ZERO, &db));

        b.forward(500, TimeUnit::Milliseconds);
        assert!(db.is_before(&da));
        assert_eq!(da.minimum(&db), db);
    }

    #[test]
    fn test_is_within_tolerance() {
        let ticker = FakeTicker::new();
        let a = Deadline::after_with_ticker(100, TimeUnit::Milliseconds, ticker.shared());
        let b = a.offset(9, TimeUnit::Milliseconds);
        assert!(a.is_within(Duration::from_millis(10), &b));
        assert!(b.is_within(Duration::from_millis(10), &a));
        assert!(!a.is_within(Duration::from_millis(8), &b));
    }

    #[test]
    fn test_nano_time_roundtrip() {
        let raw = nano_time() + TimeUnit::Seconds.to_nanos(1);
        let deadline = Deadline::from_nano_time(raw);
        assert_eq!(deadline.nano_time(), raw);
        assert!(!deadline.is_expired());
    }

    #[test]
    fn test_nano_time_rebases_foreign_ticker() {
        let ticker = FakeTicker::starting_at(-42);
        let deadline = Deadline::after_with_ticker(1, TimeUnit::Hours, ticker.shared());
        let expected = nano_time() + TimeUnit::Hours.to_nanos(1);
        let tolerance = TimeUnit::Milliseconds.to_nanos(20);
        assert!((deadline.nano_time() - expected).abs() <= tolerance);
    }

    #[test]
    fn test_display() {
        let ticker = FakeTicker::new();
        let deadline = Deadline::after_with_ticker(1, TimeUnit::Nanoseconds, ticker.shared());
        assert_eq!(deadline.to_string(), "1 ns from now");
        ticker.forward_nanos(3);
        assert_eq!(deadline.to_string(), "-2 ns from now");
    }

    #[test]
    fn test_timeout_header() {
        let ticker = FakeTicker::new();
        let shared = ticker.shared();

        let deadline = Deadline::after_with_ticker(30, TimeUnit::Seconds, Arc::clone(&shared));
        assert_eq!(deadline.timeout_header(), Some("30000".to_string()));

        // Partial milliseconds round up
        let deadline = Deadline::after_with_ticker(1, TimeUnit::Nanoseconds, Arc::clone(&shared));
        assert_eq!(deadline.timeout_header(), Some("1".to_string()));

        let deadline = Deadline::after_with_ticker(
            defaults::MAX_TIMEOUT_MS,
            TimeUnit::Milliseconds,
            Arc::clone(&shared),
        );
        assert_eq!(deadline.timeout_header(), Some("9999999999".to_string()));

        // Too large (11 digits)
        let deadline = Deadline::after_with_ticker(
            defaults::MAX_TIMEOUT_MS + 1,
            TimeUnit::Milliseconds,
            Arc::clone(&shared),
        );
        assert_eq!(deadline.timeout_header(), None);

        // Expired
        let deadline = Deadline::after_with_ticker(0, TimeUnit::Seconds, shared);
        assert_eq!(deadline.timeout_header(), None);
    }
}
