//! Signed time spans in milliseconds.
//!
//! Milliseconds match the resolution of sample timestamps. The span is
//! signed so that a caller-supplied negative duration can be represented
//! and rejected by validation rather than wrapping silently.

use core::time::Duration;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;

/// A time span in milliseconds. May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Millis(pub i64);

impl Millis {
    /// The zero-length span.
    pub const ZERO: Millis = Millis(0);

    /// Create from milliseconds.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Create from whole seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * MILLIS_PER_SECOND)
    }

    /// Create from whole minutes.
    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * MILLIS_PER_MINUTE)
    }

    /// Create from fractional minutes, rounded to the nearest millisecond.
    ///
    /// The sign is preserved: a negative input never rounds to zero, it
    /// becomes at least `-1` ms. Returns `None` for NaN, infinities, and
    /// values whose millisecond count does not fit in an `i64`.
    pub fn from_minutes_f64(minutes: f64) -> Option<Self> {
        if !minutes.is_finite() {
            return None;
        }
        let scaled = minutes * MILLIS_PER_MINUTE as f64;
        let millis = if scaled < 0.0 {
            scaled.round().min(-1.0)
        } else {
            scaled.round()
        };
        if millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
            return None;
        }
        Some(Self(millis as i64))
    }

    /// Get the value in milliseconds.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Get the value in fractional minutes.
    pub fn as_minutes_f64(&self) -> f64 {
        self.0 as f64 / MILLIS_PER_MINUTE as f64
    }

    /// Whether the span is below zero.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Elapsed span from `earlier` to `later`, both Unix epoch milliseconds.
    ///
    /// Saturates instead of overflowing on extreme inputs.
    pub const fn between(earlier_ms: i64, later_ms: i64) -> Self {
        Self(later_ms.saturating_sub(earlier_ms))
    }

    /// Convert to a standard `Duration`, or `None` if negative.
    pub fn to_duration(&self) -> Option<Duration> {
        u64::try_from(self.0).ok().map(Duration::from_millis)
    }
}

impl TryFrom<Duration> for Millis {
    type Error = core::num::TryFromIntError;

    fn try_from(d: Duration) -> Result<Self, Self::Error> {
        i64::try_from(d.as_millis()).map(Self)
    }
}
