//! A single sensor observation.

/// One reading from a sensor.
///
/// Samples are consumed in ascending `timestamp_ms` order. Nothing in this
/// crate sorts or checks that order; producers of sample sequences are
/// expected to guarantee it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Unix timestamp in milliseconds at which the value was observed.
    pub timestamp_ms: i64,

    /// Observed magnitude. Non-negative for real sensor data.
    pub value: f64,
}

impl Sample {
    /// Create a new sample.
    pub const fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// Whether this sample strictly exceeds `threshold`.
    ///
    /// A value exactly at the threshold is not overflowing.
    #[inline]
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.value > threshold
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp_ms, value): (i64, f64)) -> Self {
        Self::new(timestamp_ms, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exceeds_is_strict() {
        let s = Sample::new(0, 0.5);
        assert!(s.exceeds(0.49));
        assert!(!s.exceeds(0.5));
        assert!(!s.exceeds(0.51));
    }

    #[test]
    fn zero_value_never_exceeds_zero_threshold() {
        assert!(!Sample::new(0, 0.0).exceeds(0.0));
    }

    #[test]
    fn from_tuple() {
        let s: Sample = (1_703_160_000_000, 0.25).into();
        assert_eq!(s.timestamp_ms, 1_703_160_000_000);
        assert_eq!(s.value, 0.25);
    }
}
