//! Derivation of contiguous "key held" intervals from discrete down/up
//! events.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{KeyEventKind, KeyboardEvent};

/// A contiguous interval during which one or more keys were held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyHoldSegment {
    pub start_ms: f64,
    pub end_ms: f64,
    pub keys: BTreeSet<String>,
}

impl KeyHoldSegment {
    fn single(start_ms: f64, end_ms: f64, key: &str) -> Self {
        Self {
            start_ms,
            end_ms,
            keys: BTreeSet::from([key.to_string()]),
        }
    }

    /// Whether the playhead time falls inside this segment.
    pub fn contains(&self, time_ms: f64) -> bool {
        time_ms >= self.start_ms && time_ms <= self.end_ms
    }
}

/// Build the ordered, non-overlapping hold-segment list for a keyboard
/// stream.
///
/// Pairing rules: a release with no matching press was already held when
/// capture began and yields `[0, up]`; a press never released before capture
/// ended yields `[down, duration_ms]`. Overlapping segments are merged with
/// the union of their key sets.
pub fn build_key_hold_segments(
    events: &[KeyboardEvent],
    duration_ms: f64,
) -> Vec<KeyHoldSegment> {
    let mut segments = Vec::new();
    // key -> pending press timestamp
    let mut pending: HashMap<&str, f64> = HashMap::new();

    for event in events {
        match event.kind {
            KeyEventKind::Down => {
                pending.entry(event.key.as_str()).or_insert(event.timestamp_ms);
            }
            KeyEventKind::Up => {
                let start_ms = pending.remove(event.key.as_str()).unwrap_or(0.0);
                segments.push(KeyHoldSegment::single(
                    start_ms,
                    event.timestamp_ms,
                    &event.key,
                ));
            }
        }
    }

    // Keys still held when capture ended.
    for (key, start_ms) in pending {
        segments.push(KeyHoldSegment::single(start_ms, duration_ms, key));
    }

    segments.sort_by(|a, b| a.start_ms.total_cmp(&b.start_ms));
    merge_overlapping(segments)
}

/// Single left-to-right merge pass over a start-sorted segment list.
fn merge_overlapping(segments: Vec<KeyHoldSegment>) -> Vec<KeyHoldSegment> {
    let mut merged: Vec<KeyHoldSegment> = Vec::with_capacity(segments.len());

    for segment in segments {
        match merged.last_mut() {
            Some(current) if segment.start_ms <= current.end_ms => {
                current.end_ms = current.end_ms.max(segment.end_ms);
                current.keys.extend(segment.keys);
            }
            _ => merged.push(segment),
        }
    }

    merged
}
