//! Frame-timing payload normalization.

use serde::Deserialize;

use crate::ingest::sanitize_timestamp_ms;
use crate::model::{FrameData, FrameSample};
use crate::timeline::summarize_frames;

/// Nominal frame rate assumed when neither the payload nor the caller
/// provides one.
pub const DEFAULT_TARGET_FPS: f64 = 30.0;

/// Raw frame-timing payloads come in two historical shapes, distinguished by
/// the presence of a `frames` list versus pre-normalized `samples`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawFramePayload {
    /// Per-frame capture records with an optional explicit delta time.
    Frames(RawFrameList),
    /// Already-normalized samples with their summary.
    Canonical(FrameData),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrameList {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub target_fps: Option<f64>,
    pub frames: Vec<RawFrame>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFrame {
    #[serde(default)]
    pub timestamp_ms: f64,
    #[serde(default)]
    pub delta_time_seconds: Option<f64>,
    #[serde(default)]
    pub video_frame_index: Option<u64>,
    #[serde(default)]
    pub is_paused: Option<bool>,
}

/// Normalize a raw frame-timing payload into samples plus summary.
///
/// Frame time comes from the explicit per-frame delta when present,
/// otherwise from the difference to the previous frame's timestamp; the
/// first frame falls back to the nominal interval of the target rate. FPS is
/// `1000 / frame_time_ms`, or the target rate when the frame time is not
/// positive. A missing payload yields empty samples and a zeroed summary.
pub fn normalize_frames(payload: Option<RawFramePayload>, default_target_fps: f64) -> FrameData {
    match payload {
        None => FrameData::default(),
        Some(RawFramePayload::Frames(list)) => normalize_frame_list(list, default_target_fps),
        Some(RawFramePayload::Canonical(mut data)) => {
            for sample in &mut data.samples {
                sample.timestamp_ms = sanitize_timestamp_ms(sample.timestamp_ms);
            }
            data.samples
                .sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
            data
        }
    }
}

fn normalize_frame_list(list: RawFrameList, default_target_fps: f64) -> FrameData {
    let target_fps = list
        .target_fps
        .filter(|fps| fps.is_finite() && *fps > 0.0)
        .unwrap_or_else(|| {
            if default_target_fps.is_finite() && default_target_fps > 0.0 {
                default_target_fps
            } else {
                DEFAULT_TARGET_FPS
            }
        });
    let nominal_frame_time_ms = 1000.0 / target_fps;

    let mut samples = Vec::with_capacity(list.frames.len());
    let mut prev_timestamp_ms = None;

    for frame in &list.frames {
        let timestamp_ms = sanitize_timestamp_ms(frame.timestamp_ms);
        let frame_time_ms = match (frame.delta_time_seconds, prev_timestamp_ms) {
            (Some(delta), _) => delta * 1000.0,
            (None, Some(prev)) => timestamp_ms - prev,
            (None, None) => nominal_frame_time_ms,
        };
        let fps = if frame_time_ms > 0.0 {
            1000.0 / frame_time_ms
        } else {
            target_fps
        };
        samples.push(FrameSample::new(timestamp_ms, frame_time_ms, fps));
        prev_timestamp_ms = Some(timestamp_ms);
    }

    let summary = summarize_frames(&samples);
    samples.sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));

    FrameData { samples, summary }
}
