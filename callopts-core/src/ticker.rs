//! Monotonic time sources for [`Deadline`](crate::Deadline).
//!
//! - [`Ticker`]: the single-method capability a deadline reads time from
//! - [`SystemTicker`]: the process-wide production ticker
//! - [`nano_time`]: raw readings on the system ticker basis

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// A monotonic time source with nanosecond resolution.
///
/// Readings are only meaningful relative to other readings of the same
/// ticker. They may be negative and carry no relation to wall-clock time.
pub trait Ticker: Send + Sync + 'static {
    /// Current reading in nanoseconds.
    fn read(&self) -> i64;
}

/// Production ticker backed by [`Instant`].
///
/// Readings are nanoseconds elapsed since the first time any
/// `SystemTicker` was read in this process.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTicker;

impl SystemTicker {
    /// The shared instance every deadline built without an explicit ticker uses.
    pub fn shared() -> Arc<dyn Ticker> {
        static SHARED: OnceLock<Arc<dyn Ticker>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(SystemTicker) as Arc<dyn Ticker>))
    }
}

impl Ticker for SystemTicker {
    fn read(&self) -> i64 {
        static ORIGIN: OnceLock<Instant> = OnceLock::new();
        let origin = *ORIGIN.get_or_init(Instant::now);
        // ~292 years of uptime before this saturates
        i64::try_from(origin.elapsed().as_nanos()).unwrap_or(i64::MAX)
    }
}

/// Read the system ticker.
///
/// This is the basis for the raw nanosecond timestamps accepted by
/// [`Deadline::from_nano_time`](crate::Deadline::from_nano_time).
pub fn nano_time() -> i64 {
    SystemTicker.read()
}

/// Identity of a shared ticker, used to decide whether two deadlines share a
/// time basis.
pub(crate) fn same_ticker(a: &Arc<dyn Ticker>, b: &Arc<dyn Ticker>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

pub(crate) struct TickerRef<'a>(pub(crate) &'a Arc<dyn Ticker>);

impl fmt::Debug for TickerRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if same_ticker(self.0, &SystemTicker::shared()) {
            f.write_str("SystemTicker")
        } else {
            write!(f, "Ticker@{:p}", Arc::as_ptr(self.0) as *const ())
        }
    }
}
