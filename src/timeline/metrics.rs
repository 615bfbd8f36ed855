//! Frame-rate summary statistics.

use crate::model::{FrameSample, FrameSummary};

/// Samples below this instantaneous rate count as stutters.
pub const STUTTER_THRESHOLD_FPS: f64 = 30.0;

/// Aggregate a frame-sample sequence into its display summary.
///
/// An empty sequence yields an all-zero summary, never NaN: the summary is
/// rendered unconditionally by consumers.
///
/// `p99_frame_time_ms` is `1000 / min_fps`: a worst-frame proxy, not a true
/// 99th-percentile statistic. Downstream displays assume this exact value.
pub fn summarize_frames(samples: &[FrameSample]) -> FrameSummary {
    if samples.is_empty() {
        return FrameSummary::default();
    }

    let mut sum = 0.0;
    let mut min_fps = f64::INFINITY;
    let mut max_fps = f64::NEG_INFINITY;
    let mut stutter_count = 0;

    for sample in samples {
        sum += sample.fps;
        min_fps = min_fps.min(sample.fps);
        max_fps = max_fps.max(sample.fps);
        if sample.fps < STUTTER_THRESHOLD_FPS {
            stutter_count += 1;
        }
    }

    FrameSummary {
        avg_fps: sum / samples.len() as f64,
        min_fps,
        max_fps,
        p99_frame_time_ms: if min_fps > 0.0 { 1000.0 / min_fps } else { 0.0 },
        stutter_count,
    }
}
