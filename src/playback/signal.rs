//! The shared playback clock.
//!
//! One `TimeSignal` per viewing session holds the authoritative playhead.
//! Video, graphs, timelines, and the log panel all derive from it and write
//! back into it through the operations here; it is the sole mutation
//! surface for playback state.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::playback::clock::{MonotonicClock, WallClock};
use crate::playback::device::{DeviceEvent, PlaybackDevice};

/// Device time updates arriving within this window after a programmatic
/// seek echo the value we just wrote; they are dropped to avoid a feedback
/// loop.
pub const SEEK_SUPPRESSION_WINDOW_MS: u64 = 100;

/// Accepted device time updates are spaced at least this far apart (~15 Hz)
/// to bound render churn.
pub const DEVICE_UPDATE_MIN_INTERVAL_MS: u64 = 66;

/// Snapshot of the playback clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeState {
    pub current_time_ms: f64,
    pub duration_ms: f64,
    pub is_playing: bool,
    pub playback_rate: f64,
}

impl Default for TimeState {
    fn default() -> Self {
        Self {
            current_time_ms: 0.0,
            duration_ms: 0.0,
            is_playing: false,
            playback_rate: 1.0,
        }
    }
}

/// Handle returned by [`TimeSignal::subscribe`].
pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&TimeState)>;

/// Observable playback clock with a two-way device bridge.
///
/// Subscribers are notified synchronously, in subscription order, after
/// every accepted state change. Everything is single-threaded; the only
/// reentrancy concern (device notifications racing programmatic seeks) is
/// handled by the wall-clock suppression windows.
pub struct TimeSignal {
    state: TimeState,
    device: Option<Box<dyn PlaybackDevice>>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription_id: SubscriptionId,
    clock: Box<dyn WallClock>,
    last_seek_wall_ms: Option<u64>,
    last_device_update_wall_ms: Option<u64>,
}

impl TimeSignal {
    pub fn new() -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()))
    }

    /// Create a signal with an explicit wall-clock source (tests use
    /// [`crate::playback::ManualClock`]).
    pub fn with_clock(clock: Box<dyn WallClock>) -> Self {
        Self {
            state: TimeState::default(),
            device: None,
            subscribers: Vec::new(),
            next_subscription_id: 0,
            clock,
            last_seek_wall_ms: None,
            last_device_update_wall_ms: None,
        }
    }

    pub fn state(&self) -> TimeState {
        self.state
    }

    pub fn current_time_ms(&self) -> f64 {
        self.state.current_time_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.state.duration_ms
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn playback_rate(&self) -> f64 {
        self.state.playback_rate
    }

    /// Register an observer. Observers run synchronously after every
    /// accepted state change, in subscription order.
    pub fn subscribe(&mut self, observer: impl FnMut(&TimeState) + 'static) -> SubscriptionId {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Move the playhead to an absolute time, clamped to `[0, duration]`.
    ///
    /// NaN is a no-op; this never fails. The clamped time is pushed to an
    /// attached device, and the seek instant is recorded so the device's
    /// echoed time update gets suppressed.
    pub fn seek(&mut self, time_ms: f64) {
        if time_ms.is_nan() {
            return;
        }
        let clamped = time_ms.clamp(0.0, self.state.duration_ms.max(0.0));
        self.state.current_time_ms = clamped;
        if let Some(device) = &mut self.device {
            device.seek_to(clamped);
        }
        self.last_seek_wall_ms = Some(self.clock.now_ms());
        self.notify();
    }

    /// Step the playhead by a signed delta (keyboard-shortcut stepping).
    pub fn seek_relative(&mut self, delta_ms: f64) {
        self.seek(self.state.current_time_ms + delta_ms);
    }

    pub fn play(&mut self) {
        self.state.is_playing = true;
        if let Some(device) = &mut self.device {
            device.play();
        }
        self.notify();
    }

    pub fn pause(&mut self) {
        self.state.is_playing = false;
        if let Some(device) = &mut self.device {
            device.pause();
        }
        self.notify();
    }

    pub fn toggle(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Set the playback rate. Rates that are not finite and positive are
    /// ignored.
    pub fn set_playback_rate(&mut self, rate: f64) {
        if !rate.is_finite() || rate <= 0.0 {
            return;
        }
        self.state.playback_rate = rate;
        if let Some(device) = &mut self.device {
            device.set_rate(rate);
        }
        self.notify();
    }

    /// Set the authoritative session duration, as reported by the data
    /// layer. Once positive, a device-reported duration never overwrites it
    /// (see [`DeviceEvent::MetadataReady`] handling).
    pub fn set_duration(&mut self, duration_ms: f64) {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return;
        }
        self.state.duration_ms = duration_ms;
        // Keep the playhead inside the new bounds.
        if self.state.current_time_ms > duration_ms {
            self.state.current_time_ms = duration_ms;
        }
        self.notify();
    }

    /// Bind a playback device. The current rate is pushed immediately so the
    /// device starts in sync.
    pub fn attach_device(&mut self, mut device: Box<dyn PlaybackDevice>) {
        device.set_rate(self.state.playback_rate);
        self.device = Some(device);
    }

    /// Unbind the playback device, returning it.
    pub fn detach_device(&mut self) -> Option<Box<dyn PlaybackDevice>> {
        self.device.take()
    }

    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Feed a native device notification into the signal.
    ///
    /// Time updates are dropped within [`SEEK_SUPPRESSION_WINDOW_MS`] of a
    /// programmatic seek and throttled to one per
    /// [`DEVICE_UPDATE_MIN_INTERVAL_MS`]. Play/stop transitions apply
    /// unconditionally. A reported duration only fills in when no
    /// authoritative duration exists yet.
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::TimeUpdated { time_ms } => {
                let now = self.clock.now_ms();
                if let Some(seek_at) = self.last_seek_wall_ms
                    && now.saturating_sub(seek_at) < SEEK_SUPPRESSION_WINDOW_MS
                {
                    trace!(time_ms, "device time update suppressed after seek");
                    return;
                }
                if let Some(update_at) = self.last_device_update_wall_ms
                    && now.saturating_sub(update_at) < DEVICE_UPDATE_MIN_INTERVAL_MS
                {
                    return;
                }
                self.last_device_update_wall_ms = Some(now);

                let time_ms = if time_ms.is_finite() && time_ms >= 0.0 {
                    time_ms
                } else {
                    0.0
                };
                self.state.current_time_ms = if self.state.duration_ms > 0.0 {
                    time_ms.min(self.state.duration_ms)
                } else {
                    time_ms
                };
                self.notify();
            }
            DeviceEvent::Started => {
                self.state.is_playing = true;
                self.notify();
            }
            DeviceEvent::Stopped => {
                self.state.is_playing = false;
                self.notify();
            }
            DeviceEvent::MetadataReady { duration_ms } => {
                if self.state.duration_ms <= 0.0
                    && duration_ms.is_finite()
                    && duration_ms > 0.0
                {
                    self.state.duration_ms = duration_ms;
                    self.notify();
                }
            }
        }
    }

    fn notify(&mut self) {
        let snapshot = self.state;
        for (_, observer) in &mut self.subscribers {
            observer(&snapshot);
        }
    }
}

impl Default for TimeSignal {
    fn default() -> Self {
        Self::new()
    }
}
