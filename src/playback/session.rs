//! The session-view controller.

use crate::model::{FrameData, FrameSample, InputData, LogData};
use crate::playback::clock::WallClock;
use crate::playback::device::{DeviceEvent, PlaybackDevice};
use crate::playback::shortcuts::{KeyChord, ShortcutMap, TransportAction};
use crate::playback::signal::TimeSignal;
use crate::timeline::segments::{KeyHoldSegment, build_key_hold_segments};
use crate::timeline::{first_at_or_after, last_at_or_before};

/// One open viewing session: the authoritative clock, the immutable data
/// snapshots, and the structures derived from them.
///
/// The shortcut map lives and dies with the session, so no key handling
/// outlives the view. Data sequences are immutable for the session's
/// lifetime; derived structures are computed once at construction.
pub struct ViewerSession {
    signal: TimeSignal,
    shortcuts: ShortcutMap,
    inputs: InputData,
    segments: Vec<KeyHoldSegment>,
    frames: FrameData,
    logs: LogData,
}

impl ViewerSession {
    /// Build a session from normalized data and the authoritative duration
    /// (milliseconds, typically from the bundle manifest).
    pub fn new(duration_ms: f64, inputs: InputData, frames: FrameData, logs: LogData) -> Self {
        Self::build(TimeSignal::new(), duration_ms, inputs, frames, logs)
    }

    /// Like [`ViewerSession::new`] with an explicit wall-clock source, for
    /// deterministic suppression-window behavior in tests.
    pub fn with_clock(
        clock: Box<dyn WallClock>,
        duration_ms: f64,
        inputs: InputData,
        frames: FrameData,
        logs: LogData,
    ) -> Self {
        Self::build(TimeSignal::with_clock(clock), duration_ms, inputs, frames, logs)
    }

    fn build(
        mut signal: TimeSignal,
        duration_ms: f64,
        inputs: InputData,
        frames: FrameData,
        logs: LogData,
    ) -> Self {
        signal.set_duration(duration_ms);
        let segments = build_key_hold_segments(&inputs.keyboard, signal.duration_ms());
        Self {
            signal,
            shortcuts: ShortcutMap::default(),
            inputs,
            segments,
            frames,
            logs,
        }
    }

    /// Swap in a different shortcut map (e.g. from the viewer config).
    pub fn set_shortcuts(&mut self, shortcuts: ShortcutMap) {
        self.shortcuts = shortcuts;
    }

    pub fn signal(&self) -> &TimeSignal {
        &self.signal
    }

    pub fn signal_mut(&mut self) -> &mut TimeSignal {
        &mut self.signal
    }

    pub fn inputs(&self) -> &InputData {
        &self.inputs
    }

    pub fn segments(&self) -> &[KeyHoldSegment] {
        &self.segments
    }

    pub fn frames(&self) -> &FrameData {
        &self.frames
    }

    pub fn logs(&self) -> &LogData {
        &self.logs
    }

    /// Index of the log entry active at the playhead (the latest entry at or
    /// before it).
    pub fn active_log_index(&self) -> Option<usize> {
        last_at_or_before(&self.logs.entries, self.signal.current_time_ms())
    }

    /// The hold segment under the playhead, if any key is held there.
    pub fn active_segment(&self) -> Option<&KeyHoldSegment> {
        let time_ms = self.signal.current_time_ms();
        let idx = last_at_or_before(&self.segments, time_ms)?;
        let segment = &self.segments[idx];
        segment.contains(time_ms).then_some(segment)
    }

    /// The frame sample governing the playhead position.
    pub fn sample_at_playhead(&self) -> Option<&FrameSample> {
        let idx = last_at_or_before(&self.frames.samples, self.signal.current_time_ms())?;
        self.frames.samples.get(idx)
    }

    /// Index of the first log entry at or after the playhead; `len` when the
    /// playhead is past every entry. Used for scroll anchoring.
    pub fn next_log_index(&self) -> usize {
        first_at_or_after(&self.logs.entries, self.signal.current_time_ms())
    }

    /// Route a key chord to the transport.
    ///
    /// Returns whether the chord was handled. Chords are ignored while focus
    /// is inside a text-input control.
    pub fn handle_key(&mut self, chord: KeyChord, focus_in_text_input: bool) -> bool {
        if focus_in_text_input {
            return false;
        }
        let Some(action) = self.shortcuts.resolve(chord) else {
            return false;
        };
        match action.seek_delta_ms() {
            None => self.signal.toggle(),
            Some(delta_ms) => self.signal.seek_relative(delta_ms),
        }
        true
    }

    /// Forward a native device notification to the clock.
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        self.signal.handle_device_event(event);
    }

    /// Bind the playback device for this session.
    pub fn attach_device(&mut self, device: Box<dyn PlaybackDevice>) {
        self.signal.attach_device(device);
    }

    pub fn detach_device(&mut self) -> Option<Box<dyn PlaybackDevice>> {
        self.signal.detach_device()
    }

    /// Actions currently bound, for help overlays.
    pub fn bound_actions(&self) -> impl Iterator<Item = TransportAction> + '_ {
        TransportAction::all()
            .iter()
            .copied()
            .filter(|action| !self.shortcuts.bindings_for(*action).is_empty())
    }
}
