//! Detection parameters.

use overflow_types::Millis;

use crate::DetectError;

/// Parameters controlling a detection scan.
///
/// Construct directly, via [`DetectionParams::builder`], or take the
/// defaults (threshold 0, minimum duration 5 minutes, maximum gap 10
/// minutes). Values are checked by [`DetectionParams::validate`], which
/// [`detect`](crate::detect) calls before scanning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// A sample overflows when its value is strictly above this.
    pub threshold: f64,
    /// Shortest `end - start` an interval must span to be reported.
    pub min_duration: Millis,
    /// Longest tolerated span from the last overflowing sample to a dry
    /// sample before the interval is closed.
    pub max_gap: Millis,
}

/// Default threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.0;

/// Default minimum duration, in minutes.
pub const DEFAULT_MIN_DURATION_MINUTES: i64 = 5;

/// Default maximum gap, in minutes.
pub const DEFAULT_MAX_GAP_MINUTES: i64 = 10;

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_duration: Millis::from_minutes(DEFAULT_MIN_DURATION_MINUTES),
            max_gap: Millis::from_minutes(DEFAULT_MAX_GAP_MINUTES),
        }
    }
}

impl DetectionParams {
    /// Create parameters from explicit values.
    pub const fn new(threshold: f64, min_duration: Millis, max_gap: Millis) -> Self {
        Self {
            threshold,
            min_duration,
            max_gap,
        }
    }

    /// Create a new builder starting from the defaults.
    pub fn builder() -> DetectionParamsBuilder {
        DetectionParamsBuilder::default()
    }

    /// Check that every parameter is non-negative.
    ///
    /// A NaN threshold is rejected as well, since it is not `>= 0`.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(DetectError::invalid("threshold", self.threshold));
        }
        if self.min_duration.is_negative() {
            return Err(DetectError::invalid(
                "minDuration",
                format!("{} minutes", self.min_duration.as_minutes_f64()),
            ));
        }
        if self.max_gap.is_negative() {
            return Err(DetectError::invalid(
                "maxGap",
                format!("{} minutes", self.max_gap.as_minutes_f64()),
            ));
        }
        Ok(())
    }
}

/// Builder for [`DetectionParams`].
#[derive(Debug, Default)]
pub struct DetectionParamsBuilder {
    threshold: Option<f64>,
    min_duration: Option<Millis>,
    max_gap: Option<Millis>,
}

impl DetectionParamsBuilder {
    /// Set the threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the minimum reported duration.
    pub fn min_duration(mut self, min_duration: Millis) -> Self {
        self.min_duration = Some(min_duration);
        self
    }

    /// Set the maximum tolerated gap.
    pub fn max_gap(mut self, max_gap: Millis) -> Self {
        self.max_gap = Some(max_gap);
        self
    }

    /// Build the parameters. Unset fields take their defaults.
    pub fn build(self) -> DetectionParams {
        let defaults = DetectionParams::default();
        DetectionParams {
            threshold: self.threshold.unwrap_or(defaults.threshold),
            min_duration: self.min_duration.unwrap_or(defaults.min_duration),
            max_gap: self.max_gap.unwrap_or(defaults.max_gap),
        }
    }
}
