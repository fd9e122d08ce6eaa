//! The overflow scan.
//!
//! A two-state machine walks the samples once. While `Idle` it waits for a
//! sample above threshold; while `Active` it tracks the interval's start,
//! the timestamp of the most recent overflowing sample, and the peak value.
//! A dry sample closes the interval only when it lies more than `max_gap`
//! after the most recent overflowing sample. Closed intervals shorter than
//! `min_duration` are dropped.

use std::borrow::Borrow;
use std::iter::FusedIterator;

use overflow_types::{Millis, OverflowEvent, Sample};
use tracing::trace;

use crate::{DetectError, DetectionParams};

/// Detect overflow events in an ascending sample sequence.
///
/// Parameters are validated before anything is read from `samples`; an
/// invalid parameter fails the whole call and no events are produced.
///
/// The returned iterator is lazy and forward-only. It pulls samples only as
/// far as needed to produce the next event.
///
/// `samples` must be in ascending timestamp order. This is not checked;
/// out-of-order input yields unspecified events.
///
/// # Example
///
/// ```rust
/// use overflow_detector::{detect, DetectionParams};
/// use overflow_types::{Millis, Sample};
///
/// let minute = Millis::from_minutes(1).as_millis();
/// let samples = [
///     Sample::new(0, 0.0),
///     Sample::new(2 * minute, 0.3),
///     Sample::new(4 * minute, 0.0),
///     Sample::new(6 * minute, 0.5),
///     Sample::new(8 * minute, 0.0),
///     Sample::new(10 * minute, 0.0),
/// ];
///
/// let params = DetectionParams::new(0.1, Millis::from_minutes(2), Millis::from_minutes(2));
/// let events: Vec<_> = detect(&samples, params)?.collect();
///
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].start_ms, 2 * minute);
/// assert_eq!(events[0].end_ms, 6 * minute);
/// assert_eq!(events[0].peak_value, 0.5);
/// # Ok::<(), overflow_detector::DetectError>(())
/// ```
pub fn detect<I>(
    samples: I,
    params: DetectionParams,
) -> Result<OverflowEvents<I::IntoIter>, DetectError>
where
    I: IntoIterator,
    I::Item: Borrow<Sample>,
{
    params.validate()?;
    Ok(OverflowEvents {
        samples: samples.into_iter(),
        params,
        state: ScanState::Idle,
        exhausted: false,
    })
}

/// Lazy iterator over detected [`OverflowEvent`]s.
///
/// Created by [`detect`].
#[derive(Debug, Clone)]
pub struct OverflowEvents<I> {
    samples: I,
    params: DetectionParams,
    state: ScanState,
    exhausted: bool,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Idle,
    Active(Interval),
}

/// A candidate interval that has not been closed yet.
#[derive(Debug, Clone, Copy)]
struct Interval {
    start_ms: i64,
    last_seen_ms: i64,
    peak: f64,
}

impl Interval {
    fn open(sample: &Sample) -> Self {
        Self {
            start_ms: sample.timestamp_ms,
            last_seen_ms: sample.timestamp_ms,
            peak: sample.value,
        }
    }

    fn extend(&mut self, sample: &Sample) {
        // TODO: decide whether an overflowing sample should count for its own
        // sampling period (last_seen + 2 minutes); that would move both the
        // gap and the minimum-duration checks.
        self.last_seen_ms = sample.timestamp_ms;
        if sample.value > self.peak {
            self.peak = sample.value;
        }
    }

    fn gap_until(&self, sample: &Sample) -> Millis {
        Millis::between(self.last_seen_ms, sample.timestamp_ms)
    }

    fn close(self, min_duration: Millis) -> Option<OverflowEvent> {
        let event = OverflowEvent::new(self.start_ms, self.last_seen_ms, self.peak);
        if event.duration() >= min_duration {
            trace!(
                start_ms = event.start_ms,
                end_ms = event.end_ms,
                peak = event.peak_value,
                "overflow interval emitted"
            );
            Some(event)
        } else {
            trace!(
                start_ms = event.start_ms,
                end_ms = event.end_ms,
                "overflow interval shorter than minimum duration"
            );
            None
        }
    }
}

impl<I> OverflowEvents<I> {
    /// The parameters this scan was started with.
    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Advance the state machine by one sample, returning an event if the
    /// sample closed a qualifying interval.
    fn step(&mut self, sample: &Sample) -> Option<OverflowEvent> {
        let overflowing = sample.exceeds(self.params.threshold);

        match &mut self.state {
            ScanState::Idle => {
                if overflowing {
                    self.state = ScanState::Active(Interval::open(sample));
                }
                None
            }
            ScanState::Active(interval) => {
                if overflowing {
                    interval.extend(sample);
                    None
                } else if interval.gap_until(sample) > self.params.max_gap {
                    let closed = *interval;
                    self.state = ScanState::Idle;
                    closed.close(self.params.min_duration)
                } else {
                    None
                }
            }
        }
    }

    fn flush(&mut self) -> Option<OverflowEvent> {
        match std::mem::replace(&mut self.state, ScanState::Idle) {
            ScanState::Active(interval) => interval.close(self.params.min_duration),
            ScanState::Idle => None,
        }
    }
}

impl<I> Iterator for OverflowEvents<I>
where
    I: Iterator,
    I::Item: Borrow<Sample>,
{
    type Item = OverflowEvent;

    fn next(&mut self) -> Option<OverflowEvent> {
        if self.exhausted {
            return None;
        }

        while let Some(item) = self.samples.next() {
            if let Some(event) = self.step(item.borrow()) {
                return Some(event);
            }
        }

        self.exhausted = true;
        self.flush()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        // Every event needs at least one sample; an open interval may flush one more.
        let pending = usize::from(matches!(self.state, ScanState::Active(_)));
        let upper = self
            .samples
            .size_hint()
            .1
            .and_then(|n| n.checked_add(pending));
        (0, upper)
    }
}

impl<I> FusedIterator for OverflowEvents<I>
where
    I: Iterator,
    I::Item: Borrow<Sample>,
{
}
