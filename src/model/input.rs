use serde::{Deserialize, Serialize};

/// Direction of a keyboard transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    Down,
    Up,
}

/// A single keyboard event, with its timestamp relative to session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardEvent {
    pub timestamp_ms: f64,
    #[serde(rename = "type")]
    pub kind: KeyEventKind,
    pub key: String,
    #[serde(default)]
    pub key_code: i32,
}

/// Mouse event subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseEventKind {
    Down,
    Up,
    Move,
    Wheel,
}

/// A single mouse event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseEvent {
    pub timestamp_ms: f64,
    #[serde(rename = "type")]
    pub kind: MouseEventKind,
    /// Button index for down/up events (0 = left, 1 = middle, 2 = right).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<u8>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
}

/// Gamepad event subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamepadEventKind {
    Button,
    Axis,
}

/// A single gamepad event.
///
/// Control identity is carried as a name (`button`). Payloads that only
/// provide a numeric control index are given a synthesized `Button<n>` name
/// during ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamepadEvent {
    pub timestamp_ms: f64,
    #[serde(rename = "type")]
    pub kind: GamepadEventKind,
    pub button: String,
    /// Axis deflection, or button pressure (1.0/0.0 for digital presses).
    #[serde(default)]
    pub value: f64,
}

impl GamepadEvent {
    /// Whether this event represents a button press.
    pub fn is_press(&self) -> bool {
        self.kind == GamepadEventKind::Button && self.value > 0.5
    }
}

/// Normalized input-device streams for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    #[serde(default)]
    pub keyboard: Vec<KeyboardEvent>,
    #[serde(default)]
    pub mouse: Vec<MouseEvent>,
    #[serde(default)]
    pub gamepad: Vec<GamepadEvent>,
}

impl InputData {
    /// Total number of events across all streams.
    pub fn event_count(&self) -> usize {
        self.keyboard.len() + self.mouse.len() + self.gamepad.len()
    }

    /// Check if no events are recorded in any stream.
    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_event_serialization() {
        let event = KeyboardEvent {
            timestamp_ms: 1250.5,
            kind: KeyEventKind::Down,
            key: "W".to_string(),
            key_code: 87,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"down\""));
        assert!(json.contains("\"timestampMs\":1250.5"));

        let back: KeyboardEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn gamepad_press_detection() {
        let press = GamepadEvent {
            timestamp_ms: 0.0,
            kind: GamepadEventKind::Button,
            button: "FaceButtonBottom".to_string(),
            value: 1.0,
        };
        let axis = GamepadEvent {
            kind: GamepadEventKind::Axis,
            ..press.clone()
        };
        assert!(press.is_press());
        assert!(!axis.is_press());
    }

    #[test]
    fn input_data_event_count() {
        let mut data = InputData::default();
        assert!(data.is_empty());

        data.mouse.push(MouseEvent {
            timestamp_ms: 10.0,
            kind: MouseEventKind::Move,
            button: None,
            x: 100.0,
            y: 200.0,
            delta_x: None,
            delta_y: None,
        });
        assert_eq!(data.event_count(), 1);
        assert!(!data.is_empty());
    }
}
