use criterion::{Criterion, black_box, criterion_group, criterion_main};

use reproscope::model::{FrameSample, KeyEventKind, KeyboardEvent, LogEntry, LogLevel};
use reproscope::timeline::{
    build_key_hold_segments, first_at_or_after, last_at_or_before, summarize_frames,
};

fn keyboard_events(count: usize) -> Vec<KeyboardEvent> {
    // Alternating press/release over a small key set, with enough overlap to
    // exercise the merge pass.
    let keys = ["W", "A", "S", "D", "Space", "Shift"];
    (0..count)
        .map(|i| KeyboardEvent {
            timestamp_ms: (i * 37) as f64,
            kind: if i % 2 == 0 {
                KeyEventKind::Down
            } else {
                KeyEventKind::Up
            },
            key: keys[(i / 2) % keys.len()].to_string(),
            key_code: 0,
        })
        .collect()
}

fn log_entries(count: usize) -> Vec<LogEntry> {
    (0..count)
        .map(|i| LogEntry {
            timestamp_ms: (i * 16) as f64,
            level: LogLevel::Log,
            category: "Engine".to_string(),
            message: "tick".to_string(),
        })
        .collect()
}

fn frame_samples(count: usize) -> Vec<FrameSample> {
    (0..count)
        .map(|i| {
            let frame_time_ms = if i % 97 == 0 { 80.0 } else { 16.7 };
            FrameSample::new((i as f64) * 16.7, frame_time_ms, 1000.0 / frame_time_ms)
        })
        .collect()
}

fn segment_benchmark(c: &mut Criterion) {
    let events = keyboard_events(10_000);
    c.bench_function("build_key_hold_segments_10k", |b| {
        b.iter(|| build_key_hold_segments(black_box(&events), 400_000.0));
    });
}

fn index_benchmark(c: &mut Criterion) {
    let entries = log_entries(100_000);
    c.bench_function("playhead_lookup_100k", |b| {
        let mut t = 0.0;
        b.iter(|| {
            t = (t + 977.0) % 1_600_000.0;
            let before = last_at_or_before(black_box(&entries), t);
            let after = first_at_or_after(black_box(&entries), t);
            black_box((before, after));
        });
    });
}

fn metrics_benchmark(c: &mut Criterion) {
    let samples = frame_samples(50_000);
    c.bench_function("summarize_frames_50k", |b| {
        b.iter(|| summarize_frames(black_box(&samples)));
    });
}

criterion_group!(benches, segment_benchmark, index_benchmark, metrics_benchmark);
criterion_main!(benches);
