//! Ordered-sequence lookups used to pin timelines to the playhead.
//!
//! Both searches require the slice to be sorted ascending by timestamp.
//! Ingestion sorts event streams on the way in; log streams are trusted as
//! already ordered.

use crate::model::{FrameSample, GamepadEvent, KeyboardEvent, LogEntry, MouseEvent};
use crate::timeline::segments::KeyHoldSegment;

/// Anything that sits on the session timeline.
pub trait Timestamped {
    fn timestamp_ms(&self) -> f64;
}

impl Timestamped for KeyboardEvent {
    fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }
}

impl Timestamped for MouseEvent {
    fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }
}

impl Timestamped for GamepadEvent {
    fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }
}

impl Timestamped for FrameSample {
    fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }
}

impl Timestamped for LogEntry {
    fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }
}

impl Timestamped for KeyHoldSegment {
    fn timestamp_ms(&self) -> f64 {
        self.start_ms
    }
}

/// Non-finite lookup targets would corrupt the search; treat them as 0.
fn sanitize_target(t_ms: f64) -> f64 {
    if t_ms.is_finite() { t_ms } else { 0.0 }
}

/// Smallest index `i` with `seq[i].timestamp_ms() >= t_ms`, or `seq.len()`
/// if every element is earlier. Lower-bound binary search, O(log n).
pub fn first_at_or_after<T: Timestamped>(seq: &[T], t_ms: f64) -> usize {
    let t_ms = sanitize_target(t_ms);
    seq.partition_point(|e| e.timestamp_ms() < t_ms)
}

/// Largest index `i` with `seq[i].timestamp_ms() <= t_ms`, or `None` if
/// every element is later. Used to highlight the entry active at the
/// playhead.
pub fn last_at_or_before<T: Timestamped>(seq: &[T], t_ms: f64) -> Option<usize> {
    let t_ms = sanitize_target(t_ms);
    seq.partition_point(|e| e.timestamp_ms() <= t_ms).checked_sub(1)
}
