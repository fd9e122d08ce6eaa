//! Response bodies for the HTTP API.

use chrono::{DateTime, Utc};
use hyper::StatusCode;
use overflow_types::OverflowEvent;
use serde::Serialize;

/// An overflow event as returned by `/events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: f64,
    pub peak_value: f64,
}

impl EventBody {
    /// Convert a detected event. Returns `None` if either timestamp is
    /// outside the range chrono can represent.
    pub fn from_event(event: &OverflowEvent) -> Option<Self> {
        Some(Self {
            start: DateTime::from_timestamp_millis(event.start_ms)?,
            end: DateTime::from_timestamp_millis(event.end_ms)?,
            duration_minutes: event.duration_minutes(),
            peak_value: event.peak_value,
        })
    }
}

/// An RFC 7807 problem document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
}

impl Problem {
    /// Build a problem for `status` with a human-readable `detail`.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        let (kind, title) = match status {
            StatusCode::BAD_REQUEST => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.1",
                "Bad Request",
            ),
            StatusCode::NOT_FOUND => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.5",
                "Not Found",
            ),
            StatusCode::METHOD_NOT_ALLOWED => (
                "https://tools.ietf.org/html/rfc9110#section-15.5.6",
                "Method Not Allowed",
            ),
            _ => (
                "https://tools.ietf.org/html/rfc9110#section-15.6.1",
                "Internal Server Error",
            ),
        };
        Self {
            kind,
            title,
            status: status.as_u16(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_body_uses_camel_case_and_rfc3339() {
        let event = OverflowEvent::new(1_703_160_000_000, 1_703_160_360_000, 0.42);
        let body = EventBody::from_event(&event).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["start"], "2023-12-21T12:00:00Z");
        assert_eq!(json["end"], "2023-12-21T12:06:00Z");
        assert_eq!(json["durationMinutes"], 6.0);
        assert_eq!(json["peakValue"], 0.42);
    }

    #[test]
    fn event_body_keeps_milliseconds() {
        let event = OverflowEvent::new(1_703_160_000_250, 1_703_160_000_250, 1.0);
        let json = serde_json::to_value(EventBody::from_event(&event).unwrap()).unwrap();
        assert_eq!(json["start"], "2023-12-21T12:00:00.250Z");
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        let event = OverflowEvent::new(i64::MAX, i64::MAX, 1.0);
        assert!(EventBody::from_event(&event).is_none());
    }

    #[test]
    fn problem_serializes_type_field() {
        let problem = Problem::new(StatusCode::BAD_REQUEST, "threshold must be non-negative");
        let json = serde_json::to_value(&problem).unwrap();

        assert_eq!(json["type"], "https://tools.ietf.org/html/rfc9110#section-15.5.1");
        assert_eq!(json["title"], "Bad Request");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "threshold must be non-negative");
    }

    #[test]
    fn unknown_status_maps_to_server_error() {
        let problem = Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(problem.title, "Internal Server Error");
        assert_eq!(problem.status, 500);
    }
}
