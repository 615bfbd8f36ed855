//! Keyboard transport shortcuts.
//!
//! The shortcut map is an explicit object owned by the session view. It is
//! created with the session and dropped with it, so no listener outlives an
//! open session. Bindings are serializable so they can ride in the viewer
//! config.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Coarse arrow-key seek step.
pub const COARSE_SEEK_MS: f64 = 5_000.0;
/// Arrow-key seek step with shift held.
pub const FINE_SEEK_MS: f64 = 1_000.0;
/// j/l jump step.
pub const JUMP_SEEK_MS: f64 = 10_000.0;
/// Single-frame step, approximately one frame at 30fps.
pub const FRAME_STEP_MS: f64 = 33.0;

/// Transport operations reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportAction {
    TogglePlay,
    SeekBack,
    SeekForward,
    SeekBackFine,
    SeekForwardFine,
    JumpBack,
    JumpForward,
    StepBack,
    StepForward,
}

impl TransportAction {
    pub fn all() -> &'static [TransportAction] {
        &[
            TransportAction::TogglePlay,
            TransportAction::SeekBack,
            TransportAction::SeekForward,
            TransportAction::SeekBackFine,
            TransportAction::SeekForwardFine,
            TransportAction::JumpBack,
            TransportAction::JumpForward,
            TransportAction::StepBack,
            TransportAction::StepForward,
        ]
    }

    /// Signed playhead delta for seek actions; `None` for toggle.
    pub fn seek_delta_ms(self) -> Option<f64> {
        match self {
            TransportAction::TogglePlay => None,
            TransportAction::SeekBack => Some(-COARSE_SEEK_MS),
            TransportAction::SeekForward => Some(COARSE_SEEK_MS),
            TransportAction::SeekBackFine => Some(-FINE_SEEK_MS),
            TransportAction::SeekForwardFine => Some(FINE_SEEK_MS),
            TransportAction::JumpBack => Some(-JUMP_SEEK_MS),
            TransportAction::JumpForward => Some(JUMP_SEEK_MS),
            TransportAction::StepBack => Some(-FRAME_STEP_MS),
            TransportAction::StepForward => Some(FRAME_STEP_MS),
        }
    }
}

/// Keys the viewer binds transport actions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutKey {
    Space,
    ArrowLeft,
    ArrowRight,
    KeyJ,
    KeyK,
    KeyL,
    Comma,
    Period,
}

/// A key plus its shift state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: ShortcutKey,
    #[serde(default)]
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: ShortcutKey) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: ShortcutKey) -> Self {
        Self { key, shift: true }
    }
}

/// Configurable action-to-chord bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutMap {
    bindings: HashMap<TransportAction, Vec<KeyChord>>,
}

impl Default for ShortcutMap {
    /// The stock transport contract: space/k toggle; arrows seek 5s (1s with
    /// shift); j/l jump 10s; ,/. step one frame.
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(
            TransportAction::TogglePlay,
            vec![
                KeyChord::plain(ShortcutKey::Space),
                KeyChord::shifted(ShortcutKey::Space),
                KeyChord::plain(ShortcutKey::KeyK),
            ],
        );
        bindings.insert(
            TransportAction::SeekBack,
            vec![KeyChord::plain(ShortcutKey::ArrowLeft)],
        );
        bindings.insert(
            TransportAction::SeekForward,
            vec![KeyChord::plain(ShortcutKey::ArrowRight)],
        );
        bindings.insert(
            TransportAction::SeekBackFine,
            vec![KeyChord::shifted(ShortcutKey::ArrowLeft)],
        );
        bindings.insert(
            TransportAction::SeekForwardFine,
            vec![KeyChord::shifted(ShortcutKey::ArrowRight)],
        );
        bindings.insert(
            TransportAction::JumpBack,
            vec![KeyChord::plain(ShortcutKey::KeyJ)],
        );
        bindings.insert(
            TransportAction::JumpForward,
            vec![KeyChord::plain(ShortcutKey::KeyL)],
        );
        bindings.insert(
            TransportAction::StepBack,
            vec![KeyChord::plain(ShortcutKey::Comma)],
        );
        bindings.insert(
            TransportAction::StepForward,
            vec![KeyChord::plain(ShortcutKey::Period)],
        );
        Self { bindings }
    }
}

impl ShortcutMap {
    /// Find the action bound to a chord, if any.
    pub fn resolve(&self, chord: KeyChord) -> Option<TransportAction> {
        TransportAction::all()
            .iter()
            .copied()
            .find(|action| self.bindings_for(*action).contains(&chord))
    }

    pub fn bindings_for(&self, action: TransportAction) -> &[KeyChord] {
        self.bindings
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the chords bound to an action.
    pub fn rebind(&mut self, action: TransportAction, chords: Vec<KeyChord>) {
        self.bindings.insert(action, chords);
    }
}
