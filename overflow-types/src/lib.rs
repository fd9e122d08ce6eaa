//! # overflow-types
//!
//! Core types for sensor overflow detection. A [`Sample`] is one scalar
//! reading at a millisecond instant; an [`OverflowEvent`] is an interval
//! during which the readings persistently exceeded a threshold.
//!
//! ## Features
//!
//! - `serde`: Serialize/Deserialize derives for all types
//!
//! ## Example
//!
//! ```rust
//! use overflow_types::{Millis, OverflowEvent, Sample};
//!
//! let first = Sample::new(0, 0.4);
//! let last = Sample::new(Millis::from_minutes(6).as_millis(), 0.9);
//!
//! let event = OverflowEvent::new(first.timestamp_ms, last.timestamp_ms, 0.9);
//! assert_eq!(event.duration(), Millis::from_minutes(6));
//! assert_eq!(event.duration_minutes(), 6.0);
//! ```

mod event;
mod millis;
mod sample;

pub use event::*;
pub use millis::*;
pub use sample::*;
