use serde::{Deserialize, Serialize};

/// One frame-timing measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSample {
    pub timestamp_ms: f64,
    pub frame_time_ms: f64,
    pub fps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_thread_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_thread_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_time_ms: Option<f64>,
}

impl FrameSample {
    pub fn new(timestamp_ms: f64, frame_time_ms: f64, fps: f64) -> Self {
        Self {
            timestamp_ms,
            frame_time_ms,
            fps,
            game_thread_ms: None,
            render_thread_ms: None,
            gpu_time_ms: None,
        }
    }
}

/// Aggregate statistics over a frame-sample sequence.
///
/// Every field is zero (never NaN) when the source sequence is empty, so
/// consumers can render the summary unconditionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    pub avg_fps: f64,
    pub min_fps: f64,
    pub max_fps: f64,
    pub p99_frame_time_ms: f64,
    pub stutter_count: usize,
}

/// Frame samples together with their summary, as one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    #[serde(default)]
    pub samples: Vec<FrameSample>,
    #[serde(default)]
    pub summary: FrameSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_is_all_zero() {
        let summary = FrameSummary::default();
        assert_eq!(summary.avg_fps, 0.0);
        assert_eq!(summary.min_fps, 0.0);
        assert_eq!(summary.max_fps, 0.0);
        assert_eq!(summary.p99_frame_time_ms, 0.0);
        assert_eq!(summary.stutter_count, 0);
    }

    #[test]
    fn frame_sample_serialization() {
        let sample = FrameSample::new(100.0, 16.67, 59.99);
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"frameTimeMs\":16.67"));
        // Optional thread timings are omitted when absent.
        assert!(!json.contains("gameThreadMs"));

        let back: FrameSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
