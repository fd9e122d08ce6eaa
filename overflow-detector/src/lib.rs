//! # overflow-detector
//!
//! Turns an ascending series of sensor [`Sample`]s into [`OverflowEvent`]s:
//! intervals during which the signal stayed above a threshold, allowing
//! short dips below it.
//!
//! Three parameters shape the result:
//!
//! - **threshold**: a sample overflows when its value is strictly greater
//! - **max_gap**: how long after the last overflowing sample a dry sample may
//!   arrive without closing the interval (gap-stitching)
//! - **min_duration**: closed intervals spanning less than this are dropped
//!
//! ## Quick Start
//!
//! ```rust
//! use overflow_detector::{detect, DetectionParams};
//! use overflow_types::{Millis, Sample};
//!
//! let samples = vec![
//!     Sample::new(0, 0.2),
//!     Sample::new(120_000, 0.05),
//!     Sample::new(240_000, 0.3),
//! ];
//!
//! let params = DetectionParams::builder()
//!     .threshold(0.1)
//!     .min_duration(Millis::from_minutes(1))
//!     .max_gap(Millis::from_minutes(5))
//!     .build();
//!
//! for event in detect(&samples, params)? {
//!     println!("{} .. {} peak {}", event.start_ms, event.end_ms, event.peak_value);
//! }
//! # Ok::<(), overflow_detector::DetectError>(())
//! ```
//!
//! Invalid parameters are reported by [`detect`] itself, before any sample is
//! read. Iterating never fails.

mod detector;
mod error;
mod params;

pub use detector::{detect, OverflowEvents};
pub use error::DetectError;
pub use params::{
    DetectionParams, DetectionParamsBuilder, DEFAULT_MAX_GAP_MINUTES,
    DEFAULT_MIN_DURATION_MINUTES, DEFAULT_THRESHOLD,
};

// Re-export types for convenience
pub use overflow_types::{Millis, OverflowEvent, Sample};
