//! Overflow events - intervals where a signal stayed above threshold.

use crate::Millis;

/// A detected overflow interval.
///
/// `start` is the timestamp of the first overflowing sample of the interval
/// and `end` is the timestamp of the last overflowing sample. `end` is never
/// the time of the dry sample that closed the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverflowEvent {
    /// Unix timestamp in milliseconds of the first overflowing sample.
    pub start_ms: i64,

    /// Unix timestamp in milliseconds of the last overflowing sample.
    pub end_ms: i64,

    /// Largest value among the overflowing samples of the interval.
    pub peak_value: f64,
}

impl OverflowEvent {
    /// Create a new event.
    pub const fn new(start_ms: i64, end_ms: i64, peak_value: f64) -> Self {
        Self {
            start_ms,
            end_ms,
            peak_value,
        }
    }

    /// Span from first to last overflowing sample.
    pub const fn duration(&self) -> Millis {
        Millis::between(self.start_ms, self.end_ms)
    }

    /// Span from first to last overflowing sample, in fractional minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.duration().as_minutes_f64()
    }

    /// Whether `self` ends strictly before `other` starts.
    pub fn precedes(&self, other: &OverflowEvent) -> bool {
        self.end_ms < other.start_ms
    }
}
