//! Bundle consistency validation.
//!
//! Validation is advisory tooling over a bundle directory: it never stops
//! the viewer from opening a bundle, it reports what a capture got wrong.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::bundle::reader::{BundleDir, file_sha256_hex};
use crate::ingest::{RawFramePayload, RawInputPayload};
use crate::model::Manifest;

/// Manifest duration and timing-derived duration may disagree by this much
/// before a warning fires.
const DURATION_TOLERANCE_MS: f64 = 100.0;
/// Input events may overrun the video duration by this much.
const INPUT_OVERRUN_TOLERANCE_MS: f64 = 100.0;

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub code: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub field: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub got: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub want: Option<String>,
}

/// Computed statistics about the bundle.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    pub manifest_duration_sec: f64,
    pub manifest_total_frames: u64,
    pub timing_frame_count: usize,
    pub timing_first_timestamp_ms: f64,
    pub timing_last_timestamp_ms: f64,
    pub timing_duration_ms: f64,
    pub input_event_count: usize,
    pub keyboard_event_count: usize,
    pub mouse_event_count: usize,
    pub gamepad_event_count: usize,
    pub input_first_timestamp_ms: f64,
    pub input_last_timestamp_ms: f64,
    pub video_fps: f64,
    pub duration_mismatch_ms: f64,
}

/// Outcome of validating one bundle.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub stats: BundleStats,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: BundleStats::default(),
        }
    }

    fn add_error(&mut self, code: &'static str, field: &'static str, message: String) {
        self.errors.push(ValidationIssue {
            code,
            field,
            message,
            got: None,
            want: None,
        });
        self.valid = false;
    }

    fn add_error_with_values(
        &mut self,
        code: &'static str,
        field: &'static str,
        message: String,
        got: String,
        want: String,
    ) {
        self.errors.push(ValidationIssue {
            code,
            field,
            message,
            got: Some(got),
            want: Some(want),
        });
        self.valid = false;
    }

    fn add_warning(&mut self, code: &'static str, field: &'static str, message: String) {
        self.warnings.push(ValidationIssue {
            code,
            field,
            message,
            got: None,
            want: None,
        });
    }

    fn add_warning_with_values(
        &mut self,
        code: &'static str,
        field: &'static str,
        message: String,
        got: String,
        want: String,
    ) {
        self.warnings.push(ValidationIssue {
            code,
            field,
            message,
            got: Some(got),
            want: Some(want),
        });
    }

    pub fn has_issue(&self, code: &str) -> bool {
        self.errors.iter().chain(&self.warnings).any(|i| i.code == code)
    }

    /// Human-readable validation report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.valid {
            out.push_str("bundle is VALID\n\n");
        } else {
            out.push_str("bundle is INVALID\n\n");
        }

        let stats = &self.stats;
        out.push_str("=== Bundle Statistics ===\n");
        let _ = writeln!(out, "Manifest:");
        let _ = writeln!(out, "  Duration: {:.3}s", stats.manifest_duration_sec);
        let _ = writeln!(out, "  Video frames: {}", stats.manifest_total_frames);
        let _ = writeln!(out, "  Video FPS: {:.1}", stats.video_fps);

        if stats.timing_frame_count > 0 {
            let _ = writeln!(out, "\nFrame timing:");
            let _ = writeln!(out, "  Samples: {}", stats.timing_frame_count);
            let _ = writeln!(
                out,
                "  Timestamp range: {:.1}ms - {:.1}ms",
                stats.timing_first_timestamp_ms, stats.timing_last_timestamp_ms
            );
        }

        if stats.input_event_count > 0 {
            let _ = writeln!(out, "\nInput events:");
            let _ = writeln!(out, "  Total: {}", stats.input_event_count);
            let _ = writeln!(
                out,
                "  Keyboard: {}, Mouse: {}, Gamepad: {}",
                stats.keyboard_event_count, stats.mouse_event_count, stats.gamepad_event_count
            );
            let _ = writeln!(
                out,
                "  Timestamp range: {:.1}ms - {:.1}ms",
                stats.input_first_timestamp_ms, stats.input_last_timestamp_ms
            );
        }

        if stats.duration_mismatch_ms > 0.0 {
            let _ = writeln!(out, "\nDuration mismatch: {:.1}ms", stats.duration_mismatch_ms);
        }

        for (title, issues) in [("ERRORS", &self.errors), ("WARNINGS", &self.warnings)] {
            if issues.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n=== {title} ===");
            for issue in issues {
                let _ = writeln!(out, "  [{}] {}", issue.code, issue.message);
                if issue.got.is_some() || issue.want.is_some() {
                    let _ = writeln!(out, "    Got:  {}", issue.got.as_deref().unwrap_or(""));
                    let _ = writeln!(out, "    Want: {}", issue.want.as_deref().unwrap_or(""));
                }
            }
        }

        out
    }
}

/// Validate a bundle directory for internal consistency.
pub fn validate_bundle(bundle: &BundleDir) -> ValidationReport {
    let mut report = ValidationReport::new();
    let manifest = bundle.manifest();

    report.stats.manifest_duration_sec = manifest.duration_seconds;
    report.stats.manifest_total_frames = manifest.total_frames;

    check_manifest(&mut report, manifest);

    match bundle.read_frames() {
        Ok(Some(payload)) => {
            check_timing(&mut report, &payload);
            check_manifest_vs_timing(&mut report, manifest);
        }
        Ok(None) => {
            report.add_warning("TIMING_LOAD", "", "timing artifact not found".to_string());
        }
        Err(e) => {
            report.add_warning("TIMING_LOAD", "", e.to_string());
        }
    }

    match bundle.read_inputs() {
        Ok(Some(payload)) => check_inputs(&mut report, &payload, manifest),
        Ok(None) => {
            report.add_warning("INPUTS_LOAD", "", "input artifact not found".to_string());
        }
        Err(e) => {
            report.add_warning("INPUTS_LOAD", "", e.to_string());
        }
    }

    check_artifact_checksums(&mut report, bundle);

    report
}

fn check_manifest(report: &mut ValidationReport, manifest: &Manifest) {
    if manifest.duration_seconds <= 0.0 {
        report.add_error(
            "MANIFEST_DURATION",
            "durationSeconds",
            format!("must be positive, got {:.3}", manifest.duration_seconds),
        );
    }
    if manifest.total_frames == 0 {
        report.add_error(
            "MANIFEST_FRAMES",
            "totalFrames",
            "must be positive, got 0".to_string(),
        );
    }
    if manifest.duration_seconds > 0.0 && manifest.total_frames > 0 {
        let fps = manifest.total_frames as f64 / manifest.duration_seconds;
        if !(1.0..=240.0).contains(&fps) {
            report.add_warning(
                "MANIFEST_FPS",
                "",
                format!(
                    "unusual FPS: {:.1} (frames={}, duration={:.2}s)",
                    fps, manifest.total_frames, manifest.duration_seconds
                ),
            );
        }
    }
}

/// Timestamps of the timing payload, in capture order, regardless of schema.
fn timing_timestamps(payload: &RawFramePayload) -> Vec<f64> {
    match payload {
        RawFramePayload::Frames(list) => list.frames.iter().map(|f| f.timestamp_ms).collect(),
        RawFramePayload::Canonical(data) => {
            data.samples.iter().map(|s| s.timestamp_ms).collect()
        }
    }
}

fn check_timing(report: &mut ValidationReport, payload: &RawFramePayload) {
    let timestamps = timing_timestamps(payload);
    if timestamps.is_empty() {
        report.add_error("TIMING_EMPTY", "frames", "no frames in timing artifact".to_string());
        return;
    }

    report.stats.timing_frame_count = timestamps.len();
    report.stats.timing_first_timestamp_ms = timestamps[0];
    report.stats.timing_last_timestamp_ms = timestamps[timestamps.len() - 1];
    report.stats.timing_duration_ms =
        report.stats.timing_last_timestamp_ms - report.stats.timing_first_timestamp_ms;

    // Raw capture frames carry a video frame index that must be sequential
    // from zero.
    if let RawFramePayload::Frames(list) = payload {
        for (i, frame) in list.frames.iter().enumerate() {
            let Some(index) = frame.video_frame_index else {
                continue;
            };
            if index != i as u64 {
                report.add_error_with_values(
                    "TIMING_INDEX_MISMATCH",
                    "videoFrameIndex",
                    "videoFrameIndex should be sequential".to_string(),
                    format!("frame[{i}].videoFrameIndex = {index}"),
                    format!("{i}"),
                );
                break;
            }
        }
    }

    if timestamps[0] > 100.0 {
        report.add_warning(
            "TIMING_NOT_NORMALIZED",
            "timestampMs",
            format!(
                "first frame timestamp is {:.1}ms (expected near 0 if normalized)",
                timestamps[0]
            ),
        );
    }

    for i in 1..timestamps.len() {
        if timestamps[i] < timestamps[i - 1] {
            report.add_error(
                "TIMING_NON_MONOTONIC",
                "timestampMs",
                format!(
                    "timestamp decreased at frame {}: {:.1}ms -> {:.1}ms",
                    i,
                    timestamps[i - 1],
                    timestamps[i]
                ),
            );
            break;
        }
    }
}

fn check_manifest_vs_timing(report: &mut ValidationReport, manifest: &Manifest) {
    let frame_count = report.stats.timing_frame_count;
    if frame_count == 0 {
        return;
    }

    if manifest.total_frames != frame_count as u64 {
        report.add_error_with_values(
            "FRAME_COUNT_MISMATCH",
            "totalFrames",
            "manifest totalFrames should match the timing artifact frame count".to_string(),
            format!("{}", manifest.total_frames),
            format!("{frame_count}"),
        );
    }

    if manifest.duration_seconds > 0.0 {
        let video_fps = manifest.total_frames as f64 / manifest.duration_seconds;
        report.stats.video_fps = video_fps;
        if !(10.0..=120.0).contains(&video_fps) {
            report.add_warning(
                "VIDEO_FPS_UNUSUAL",
                "",
                format!("video FPS ({video_fps:.1}) seems unusual"),
            );
        }
    }

    let timing_duration_sec = report.stats.timing_duration_ms / 1000.0;
    let mismatch_ms = (manifest.duration_seconds - timing_duration_sec).abs() * 1000.0;
    report.stats.duration_mismatch_ms = mismatch_ms;
    if mismatch_ms > DURATION_TOLERANCE_MS {
        report.add_warning_with_values(
            "DURATION_MISMATCH",
            "durationSeconds",
            format!("manifest duration differs from timing artifact by {mismatch_ms:.1}ms"),
            format!("{:.3}s", manifest.duration_seconds),
            format!("{timing_duration_sec:.3}s"),
        );
    }
}

/// Flattened raw input event view for validation, independent of schema.
struct RawInputView {
    timestamp_ms: f64,
    device: InputDevice,
    key: Option<(String, bool)>, // key name, pressed
}

enum InputDevice {
    Keyboard,
    Mouse,
    Gamepad,
    Other,
}

fn input_views(payload: &RawInputPayload) -> Vec<RawInputView> {
    match payload {
        RawInputPayload::Events(list) => list
            .events
            .iter()
            .map(|e| {
                let (device, key) = match e.input_type.as_str() {
                    "KeyDown" => (
                        InputDevice::Keyboard,
                        Some((e.key_name.clone(), true)),
                    ),
                    "KeyUp" => (
                        InputDevice::Keyboard,
                        Some((e.key_name.clone(), false)),
                    ),
                    tag if tag.starts_with("Mouse") => (InputDevice::Mouse, None),
                    tag if tag.starts_with("Gamepad") => (InputDevice::Gamepad, None),
                    _ => (InputDevice::Other, None),
                };
                RawInputView {
                    timestamp_ms: e.timestamp_ms,
                    device,
                    key,
                }
            })
            .collect(),
        RawInputPayload::Canonical(raw) => {
            let mut views: Vec<RawInputView> = Vec::new();
            for e in &raw.keyboard {
                views.push(RawInputView {
                    timestamp_ms: e.timestamp_ms,
                    device: InputDevice::Keyboard,
                    key: Some((
                        e.key.clone(),
                        e.kind == crate::model::KeyEventKind::Down,
                    )),
                });
            }
            for e in &raw.mouse {
                views.push(RawInputView {
                    timestamp_ms: e.timestamp_ms,
                    device: InputDevice::Mouse,
                    key: None,
                });
            }
            for e in &raw.gamepad {
                views.push(RawInputView {
                    timestamp_ms: e.timestamp_ms,
                    device: InputDevice::Gamepad,
                    key: None,
                });
            }
            views
        }
    }
}

fn check_inputs(report: &mut ValidationReport, payload: &RawInputPayload, manifest: &Manifest) {
    let views = input_views(payload);
    report.stats.input_event_count = views.len();

    if views.is_empty() {
        report.add_warning("INPUTS_EMPTY", "", "no input events recorded".to_string());
        return;
    }

    let mut min_ts = f64::MAX;
    let mut max_ts = 0.0f64;
    let mut pending_downs: HashMap<String, f64> = HashMap::new();

    for view in &views {
        min_ts = min_ts.min(view.timestamp_ms);
        max_ts = max_ts.max(view.timestamp_ms);

        match view.device {
            InputDevice::Keyboard => {
                report.stats.keyboard_event_count += 1;
                if let Some((key, pressed)) = &view.key {
                    if *pressed {
                        pending_downs.insert(key.clone(), view.timestamp_ms);
                    } else {
                        pending_downs.remove(key);
                    }
                }
            }
            InputDevice::Mouse => report.stats.mouse_event_count += 1,
            InputDevice::Gamepad => report.stats.gamepad_event_count += 1,
            InputDevice::Other => {}
        }
    }

    report.stats.input_first_timestamp_ms = min_ts;
    report.stats.input_last_timestamp_ms = max_ts;

    let video_duration_ms = manifest.duration_seconds * 1000.0;
    let out_of_range = views
        .iter()
        .filter(|v| {
            v.timestamp_ms < 0.0 || v.timestamp_ms > video_duration_ms + INPUT_OVERRUN_TOLERANCE_MS
        })
        .count();
    if out_of_range > 0 {
        report.add_warning(
            "INPUTS_OUT_OF_RANGE",
            "timestampMs",
            format!(
                "{out_of_range} input events outside video duration [0, {video_duration_ms:.1}ms]"
            ),
        );
    }

    if !pending_downs.is_empty() {
        let mut keys: Vec<&str> = pending_downs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        report.add_warning(
            "INPUTS_UNMATCHED_KEYDOWN",
            "",
            format!("KeyDown without KeyUp: {keys:?}"),
        );
    }
}

fn check_artifact_checksums(report: &mut ValidationReport, bundle: &BundleDir) {
    for artifact in bundle.manifest().resolved_artifacts() {
        let path = bundle.artifact_path(&artifact.filename);
        if !path.is_file() {
            report.add_warning(
                "ARTIFACT_MISSING",
                "filename",
                format!("declared artifact not found on disk: {}", artifact.filename),
            );
            continue;
        }
        let Some(want) = &artifact.checksum else {
            continue;
        };
        match file_sha256_hex(&path) {
            Ok(got) if got.eq_ignore_ascii_case(want) => {}
            Ok(got) => {
                report.add_warning_with_values(
                    "ARTIFACT_CHECKSUM_MISMATCH",
                    "checksum",
                    format!("checksum mismatch for {}", artifact.filename),
                    got,
                    want.clone(),
                );
            }
            Err(e) => {
                report.add_warning("ARTIFACT_CHECKSUM_MISMATCH", "checksum", e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn open_bundle(dir: &Path, manifest: &str) -> BundleDir {
        fs::write(dir.join("manifest.json"), manifest).unwrap();
        BundleDir::open(dir).unwrap()
    }

    fn timing_json(timestamps: &[f64]) -> String {
        let frames: Vec<String> = timestamps
            .iter()
            .enumerate()
            .map(|(i, t)| format!(r#"{{"videoFrameIndex": {i}, "timestampMs": {t}}}"#))
            .collect();
        format!(r#"{{"frames": [{}]}}"#, frames.join(","))
    }

    #[test]
    fn consistent_bundle_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("timing.json"),
            timing_json(&[0.0, 33.3, 66.6, 99.9]),
        )
        .unwrap();
        fs::write(
            dir.path().join("inputs.json"),
            r#"{"events": [
                {"timestampMs": 10.0, "inputType": "KeyDown", "keyName": "W"},
                {"timestampMs": 90.0, "inputType": "KeyUp", "keyName": "W"}
            ]}"#,
        )
        .unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-1", "durationSeconds": 0.1333, "totalFrames": 4}"#,
        );

        let report = validate_bundle(&bundle);
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
        assert_eq!(report.stats.timing_frame_count, 4);
        assert_eq!(report.stats.keyboard_event_count, 2);
        assert!(!report.has_issue("INPUTS_UNMATCHED_KEYDOWN"));
    }

    #[test]
    fn bad_manifest_fields_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-2", "durationSeconds": 0, "totalFrames": 0}"#,
        );
        let report = validate_bundle(&bundle);
        assert!(!report.valid);
        assert!(report.has_issue("MANIFEST_DURATION"));
        assert!(report.has_issue("MANIFEST_FRAMES"));
    }

    #[test]
    fn non_monotonic_timing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("timing.json"),
            timing_json(&[0.0, 40.0, 20.0, 60.0]),
        )
        .unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-3", "durationSeconds": 0.06, "totalFrames": 4}"#,
        );
        let report = validate_bundle(&bundle);
        assert!(report.has_issue("TIMING_NON_MONOTONIC"));
        assert!(!report.valid);
    }

    #[test]
    fn frame_count_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("timing.json"), timing_json(&[0.0, 33.0])).unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-4", "durationSeconds": 0.033, "totalFrames": 5}"#,
        );
        let report = validate_bundle(&bundle);
        assert!(report.has_issue("FRAME_COUNT_MISMATCH"));
    }

    #[test]
    fn duration_mismatch_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("timing.json"),
            timing_json(&[0.0, 500.0, 1000.0]),
        )
        .unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-5", "durationSeconds": 2.0, "totalFrames": 3}"#,
        );
        let report = validate_bundle(&bundle);
        assert!(report.has_issue("DURATION_MISMATCH"));
        assert!(report.valid, "duration mismatch alone stays a warning");
        assert!((report.stats.duration_mismatch_ms - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn unmatched_keydown_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("timing.json"), timing_json(&[0.0, 33.0])).unwrap();
        fs::write(
            dir.path().join("inputs.json"),
            r#"{"events": [
                {"timestampMs": 10.0, "inputType": "KeyDown", "keyName": "Space"},
                {"timestampMs": 5000.0, "inputType": "MouseMove"}
            ]}"#,
        )
        .unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-6", "durationSeconds": 0.033, "totalFrames": 2}"#,
        );
        let report = validate_bundle(&bundle);
        assert!(report.has_issue("INPUTS_UNMATCHED_KEYDOWN"));
        assert!(report.has_issue("INPUTS_OUT_OF_RANGE"));
        assert_eq!(report.stats.mouse_event_count, 1);
    }

    #[test]
    fn checksum_mismatch_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logs.txt"), "[1|1.0|Log] Core: up").unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-7", "durationSeconds": 1.0, "totalFrames": 30,
                "artifacts": [{"filename": "logs.txt", "type": "log",
                               "checksum": "deadbeef"}]}"#,
        );
        let report = validate_bundle(&bundle);
        assert!(report.has_issue("ARTIFACT_CHECKSUM_MISMATCH"));
        assert!(report.has_issue("TIMING_LOAD"));
    }

    #[test]
    fn missing_declared_artifact_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-8", "durationSeconds": 1.0, "totalFrames": 30,
                "artifacts": ["capture.mp4"]}"#,
        );
        let report = validate_bundle(&bundle);
        assert!(report.has_issue("ARTIFACT_MISSING"));
    }

    #[test]
    fn report_renders_sections() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = open_bundle(
            dir.path(),
            r#"{"bundleId": "b-9", "durationSeconds": 0, "totalFrames": 0}"#,
        );
        let report = validate_bundle(&bundle);
        let text = report.render();
        assert!(text.contains("INVALID"));
        assert!(text.contains("=== ERRORS ==="));
        assert!(text.contains("MANIFEST_DURATION"));
    }
}
