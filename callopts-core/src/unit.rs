//! Time units for signed durations.
//!
//! [`std::time::Duration`] cannot express the negative remaining time of an
//! expired deadline, so deadline arithmetic works in signed nanoseconds and
//! converts through [`TimeUnit`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A unit of monotonic time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Nanoseconds in one of this unit.
    pub const fn nanos_per_unit(&self) -> i64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 60 * 60 * 1_000_000_000,
            TimeUnit::Days => 24 * 60 * 60 * 1_000_000_000,
        }
    }

    /// Convert `amount` of this unit to nanoseconds, clamping to the `i64` range.
    pub const fn to_nanos(&self, amount: i64) -> i64 {
        amount.saturating_mul(self.nanos_per_unit())
    }

    /// Convert nanoseconds to this unit, truncating toward zero.
    pub const fn from_nanos(&self, nanos: i64) -> i64 {
        nanos / self.nanos_per_unit()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`TimeUnit`] from a string fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown time unit: {0:?}")]
pub struct ParseTimeUnitError(String);

impl FromStr for TimeUnit {
    type Err = ParseTimeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ns" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "seconds" => Ok(TimeUnit::Seconds),
            "min" | "minutes" => Ok(TimeUnit::Minutes),
            "h" | "hours" => Ok(TimeUnit::Hours),
            "d" | "days" => Ok(TimeUnit::Days),
            other => Err(ParseTimeUnitError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_nanos() {
        assert_eq!(TimeUnit::Nanoseconds.to_nanos(7), 7);
        assert_eq!(TimeUnit::Milliseconds.to_nanos(3), 3_000_000);
        assert_eq!(TimeUnit::Minutes.to_nanos(1), 60_000_000_000);
        assert_eq!(TimeUnit::Seconds.to_nanos(-2), -2_000_000_000);
    }

    #[test]
    fn test_to_nanos_saturates() {
        assert_eq!(TimeUnit::Days.to_nanos(i64::MAX), i64::MAX);
        assert_eq!(TimeUnit::Days.to_nanos(i64::MIN), i64::MIN);
    }

    #[test]
    fn test_from_nanos_truncates() {
        assert_eq!(TimeUnit::Milliseconds.from_nanos(1_999_999), 1);
        assert_eq!(TimeUnit::Milliseconds.from_nanos(-1_999_999), -1);
        assert_eq!(TimeUnit::Seconds.from_nanos(999_999_999), 0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("ms".parse::<TimeUnit>().unwrap(), TimeUnit::Milliseconds);
        assert_eq!("days".parse::<TimeUnit>().unwrap(), TimeUnit::Days);
        assert!("fortnights".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn test_serialize_snake_case() {
        let json = serde_json::to_string(&TimeUnit::Milliseconds).unwrap();
        assert_eq!(json, "\"milliseconds\"");
    }
}
