//! End-to-end pipeline: bundle directory on disk -> raw payloads ->
//! normalized data -> viewer session with derived structures.

use std::fs;
use std::path::Path;

use reproscope::bundle::{BundleDir, validate_bundle};
use reproscope::ingest::{normalize_frames, normalize_inputs, parse_log_text, DEFAULT_TARGET_FPS};
use reproscope::model::LogLevel;
use reproscope::playback::ViewerSession;

fn write_sample_bundle(dir: &Path) {
    fs::write(
        dir.join("manifest.json"),
        r#"{
            "schemaVersion": "1.0",
            "bundleId": "bundle-e2e",
            "durationSeconds": 10.0,
            "totalFrames": 5,
            "sessionInfo": {"mapName": "TestArena", "targetFps": 30},
            "hardwareInfo": {"platform": "Win64"},
            "artifacts": ["capture.mp4", "inputs.json", "timing.json", "logs.txt"]
        }"#,
    )
    .unwrap();

    fs::write(
        dir.join("inputs.json"),
        r#"{
            "schemaVersion": "1.0",
            "totalEvents": 6,
            "events": [
                {"timestampMs": 1000.0, "inputType": "KeyDown", "keyName": "W", "keyCode": 87},
                {"timestampMs": 3000.0, "inputType": "KeyUp", "keyName": "W", "keyCode": 87},
                {"timestampMs": 2500.0, "inputType": "KeyDown", "keyName": "Shift"},
                {"timestampMs": 4000.0, "inputType": "KeyUp", "keyName": "Shift"},
                {"timestampMs": 1200.0, "inputType": "MouseButtonDown",
                 "keyName": "LeftMouseButton", "screenPosition": [640.0, 360.0]},
                {"timestampMs": 5000.0, "inputType": "GamepadButtonDown",
                 "keyName": "FaceButtonBottom"}
            ]
        }"#,
    )
    .unwrap();

    fs::write(
        dir.join("timing.json"),
        r#"{
            "schemaVersion": "1.0",
            "frames": [
                {"videoFrameIndex": 0, "timestampMs": 0.0, "deltaTimeSeconds": 0.0333},
                {"videoFrameIndex": 1, "timestampMs": 33.3, "deltaTimeSeconds": 0.0333},
                {"videoFrameIndex": 2, "timestampMs": 66.6, "deltaTimeSeconds": 0.100},
                {"videoFrameIndex": 3, "timestampMs": 166.6, "deltaTimeSeconds": 0.0333},
                {"videoFrameIndex": 4, "timestampMs": 199.9, "deltaTimeSeconds": 0.0333}
            ]
        }"#,
    )
    .unwrap();

    // The malformed line sits first so its fallback timestamp of 0 keeps the
    // stream ordered for playhead lookups.
    fs::write(
        dir.join("logs.txt"),
        "malformed line without structure\n\
         [0|0.0|Log] Engine: session start\n\
         [30|1100.0|Warning] Physics: penetration depth high\n\
         [90|2900.0|Error] Net: packet loss spike\n",
    )
    .unwrap();

    // Video artifact so the manifest's declared list is complete on disk.
    fs::write(dir.join("capture.mp4"), b"\x00\x00\x00\x18ftyp").unwrap();
}

fn open_session(dir: &Path) -> (BundleDir, ViewerSession) {
    let bundle = BundleDir::open(dir).unwrap();
    let inputs = normalize_inputs(bundle.read_inputs().unwrap());
    let frames = normalize_frames(bundle.read_frames().unwrap(), DEFAULT_TARGET_FPS);
    let logs = match bundle.read_log_text().unwrap() {
        Some(text) => parse_log_text(&text),
        None => Default::default(),
    };
    let session = ViewerSession::new(bundle.manifest().duration_ms(), inputs, frames, logs);
    (bundle, session)
}

#[test]
fn bundle_loads_and_derives_display_structures() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_bundle(dir.path());
    let (bundle, session) = open_session(dir.path());

    assert_eq!(bundle.manifest().bundle_id, "bundle-e2e");
    assert_eq!(session.signal().duration_ms(), 10_000.0);

    // W [1000,3000] and Shift [2500,4000] overlap into one segment.
    let segments = session.segments();
    assert_eq!(segments.len(), 1, "overlapping holds should merge");
    assert_eq!(segments[0].start_ms, 1_000.0);
    assert_eq!(segments[0].end_ms, 4_000.0);
    assert!(segments[0].keys.contains("W"));
    assert!(segments[0].keys.contains("Shift"));

    // One slow frame (100ms) drops below the stutter threshold.
    let summary = &session.frames().summary;
    assert_eq!(summary.stutter_count, 1);
    assert!((summary.min_fps - 10.0).abs() < 1e-9);
    assert!((summary.p99_frame_time_ms - 100.0).abs() < 1e-9);

    // Malformed log line preserved, not counted as a category.
    let logs = session.logs();
    assert_eq!(logs.entries.len(), 4);
    assert_eq!(logs.categories, ["Engine", "Net", "Physics"]);
    assert!(logs.entries.iter().any(|e| e.category == "Unknown"));
}

#[test]
fn playhead_queries_track_the_clock_across_streams() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_bundle(dir.path());
    let (_bundle, mut session) = open_session(dir.path());

    session.signal_mut().seek(2_000.0);
    // Logs are ordered 0.0, 1100.0, 2900.0 with the fallback entry at 0.
    let idx = session.active_log_index().expect("log active at 2s");
    assert_eq!(session.logs().entries[idx].level, LogLevel::Warning);
    assert!(session.active_segment().is_some(), "W held at 2s");

    session.signal_mut().seek(4_500.0);
    assert!(session.active_segment().is_none());

    let sample = session.sample_at_playhead().expect("frame sample exists");
    assert_eq!(sample.timestamp_ms, 199.9);
}

#[test]
fn sample_bundle_passes_validation() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_bundle(dir.path());
    let bundle = BundleDir::open(dir.path()).unwrap();

    let report = validate_bundle(&bundle);
    // Frame count (5) matches, timing is monotonic, inputs are in range.
    assert!(
        report.errors.is_empty(),
        "unexpected errors: {:?}",
        report.errors
    );
    assert_eq!(report.stats.timing_frame_count, 5);
    assert_eq!(report.stats.keyboard_event_count, 4);
    assert_eq!(report.stats.mouse_event_count, 1);
    assert_eq!(report.stats.gamepad_event_count, 1);
}

#[test]
fn bundle_without_optional_artifacts_still_opens() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("manifest.json"),
        r#"{"bundleId": "sparse", "durationSeconds": 4.0, "totalFrames": 120}"#,
    )
    .unwrap();

    let (_bundle, session) = open_session(dir.path());
    assert!(session.inputs().is_empty());
    assert!(session.segments().is_empty());
    assert!(session.frames().samples.is_empty());
    assert_eq!(session.frames().summary.avg_fps, 0.0);
    assert!(session.logs().entries.is_empty());
    assert_eq!(session.signal().duration_ms(), 4_000.0);
}
