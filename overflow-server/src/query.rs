//! `/events` query string handling.
//!
//! Durations arrive in minutes and are converted to [`Millis`] here. Keys
//! are matched case-insensitively; unknown keys are ignored and the last
//! occurrence of a repeated key wins.

use overflow_detector::DetectionParams;
use overflow_types::Millis;
use thiserror::Error;

/// Errors from parsing an `/events` query string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A value could not be parsed as a number.
    #[error("Query parameter `{key}` must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    /// A duration in minutes is not representable in milliseconds.
    #[error("Query parameter `{key}` is out of range: {value}")]
    OutOfRange { key: &'static str, value: f64 },
}

const THRESHOLD: &str = "threshold";
const MIN_DURATION: &str = "minDuration";
const MAX_GAP: &str = "maxGap";

/// Parameters of an `/events` request, as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventsQuery {
    pub threshold: f64,
    pub min_duration_minutes: f64,
    pub max_gap_minutes: f64,
}

impl Default for EventsQuery {
    fn default() -> Self {
        Self {
            threshold: overflow_detector::DEFAULT_THRESHOLD,
            min_duration_minutes: overflow_detector::DEFAULT_MIN_DURATION_MINUTES as f64,
            max_gap_minutes: overflow_detector::DEFAULT_MAX_GAP_MINUTES as f64,
        }
    }
}

impl EventsQuery {
    /// Parse a raw query string (without the leading `?`), starting from `defaults`.
    pub fn parse(query: Option<&str>, defaults: EventsQuery) -> Result<Self, QueryError> {
        let mut parsed = defaults;

        for pair in query.unwrap_or_default().split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));

            let (name, slot) = if key.eq_ignore_ascii_case(THRESHOLD) {
                (THRESHOLD, &mut parsed.threshold)
            } else if key.eq_ignore_ascii_case(MIN_DURATION) {
                (MIN_DURATION, &mut parsed.min_duration_minutes)
            } else if key.eq_ignore_ascii_case(MAX_GAP) {
                (MAX_GAP, &mut parsed.max_gap_minutes)
            } else {
                continue;
            };

            *slot = value
                .trim()
                .parse::<f64>()
                .map_err(|_| QueryError::InvalidNumber {
                    key: name,
                    value: value.to_string(),
                })?;
        }

        Ok(parsed)
    }

    /// Convert to detector parameters.
    ///
    /// Negative values pass through unchanged so the detector can reject
    /// them. Non-finite thresholds and durations that cannot be expressed in
    /// milliseconds fail here.
    pub fn to_params(&self) -> Result<DetectionParams, QueryError> {
        if !self.threshold.is_finite() {
            return Err(QueryError::OutOfRange {
                key: THRESHOLD,
                value: self.threshold,
            });
        }
        let min_duration = minutes(MIN_DURATION, self.min_duration_minutes)?;
        let max_gap = minutes(MAX_GAP, self.max_gap_minutes)?;
        Ok(DetectionParams::new(self.threshold, min_duration, max_gap))
    }
}

fn minutes(key: &'static str, value: f64) -> Result<Millis, QueryError> {
    Millis::from_minutes_f64(value).ok_or(QueryError::OutOfRange { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<EventsQuery, QueryError> {
        EventsQuery::parse(Some(query), EventsQuery::default())
    }

    #[test]
    fn missing_query_uses_defaults() {
        let q = EventsQuery::parse(None, EventsQuery::default()).unwrap();
        assert_eq!(q, EventsQuery::default());
        assert_eq!(q.threshold, 0.0);
        assert_eq!(q.min_duration_minutes, 5.0);
        assert_eq!(q.max_gap_minutes, 10.0);
    }

    #[test]
    fn overrides_known_keys() {
        let q = parse("threshold=0.13&minDuration=2&maxGap=1.99").unwrap();
        assert_eq!(q.threshold, 0.13);
        assert_eq!(q.min_duration_minutes, 2.0);
        assert_eq!(q.max_gap_minutes, 1.99);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let q = parse("THRESHOLD=0.5&minduration=1&MaxGap=3").unwrap();
        assert_eq!(q.threshold, 0.5);
        assert_eq!(q.min_duration_minutes, 1.0);
        assert_eq!(q.max_gap_minutes, 3.0);
    }

    #[test]
    fn unknown_keys_and_empty_pairs_are_ignored() {
        let q = parse("&foo=bar&&threshold=0.2&").unwrap();
        assert_eq!(q.threshold, 0.2);
        assert_eq!(q.max_gap_minutes, 10.0);
    }

    #[test]
    fn last_occurrence_wins() {
        assert_eq!(parse("threshold=1&threshold=2").unwrap().threshold, 2.0);
    }

    #[test]
    fn negative_values_parse() {
        let q = parse("threshold=-0.13").unwrap();
        assert_eq!(q.threshold, -0.13);
        assert!(q.to_params().unwrap().validate().is_err());
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = parse("minDuration=abc").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidNumber {
                key: "minDuration",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn empty_value_is_rejected() {
        assert!(matches!(
            parse("maxGap="),
            Err(QueryError::InvalidNumber { key: "maxGap", .. })
        ));
        assert!(matches!(
            parse("threshold"),
            Err(QueryError::InvalidNumber { key: "threshold", .. })
        ));
    }

    #[test]
    fn to_params_converts_minutes() {
        let params = parse("minDuration=2&maxGap=0.5").unwrap().to_params().unwrap();
        assert_eq!(params.min_duration, Millis::from_minutes(2));
        assert_eq!(params.max_gap, Millis::from_secs(30));
    }

    #[test]
    fn infinite_duration_is_out_of_range() {
        let err = parse("maxGap=inf").unwrap().to_params().unwrap_err();
        assert!(matches!(err, QueryError::OutOfRange { key: "maxGap", .. }));
    }

    #[test]
    fn non_finite_threshold_is_out_of_range() {
        for query in ["threshold=inf", "threshold=-inf", "threshold=NaN"] {
            let err = parse(query).unwrap().to_params().unwrap_err();
            assert!(
                matches!(err, QueryError::OutOfRange { key: "threshold", .. }),
                "{query}"
            );
        }
    }

    #[test]
    fn tiny_negative_durations_stay_invalid() {
        for query in ["maxGap=-0.000001", "minDuration=-0.000001", "maxGap=-0.0000083"] {
            let params = parse(query).unwrap().to_params().unwrap();
            assert!(params.validate().is_err(), "{query}");
        }
    }
}
