//! Bridge to the external media-playback device.

/// Commands the signal issues to an attached playback device.
///
/// The concrete device lives outside the core (a video element, a headless
/// decoder, a test double); the signal only ever talks to it through this
/// trait.
pub trait PlaybackDevice {
    /// Move the device playhead to an absolute time.
    fn seek_to(&mut self, time_ms: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_rate(&mut self, rate: f64);
}

/// Native notifications a playback device sends back to the signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    /// Continuous playhead sampling while the device runs.
    TimeUpdated { time_ms: f64 },
    /// The device started playing.
    Started,
    /// The device stopped or paused.
    Stopped,
    /// Media metadata became available; carries the device-reported
    /// duration, used only as a fallback.
    MetadataReady { duration_ms: f64 },
}
