//! Input-event payload normalization.

use serde::Deserialize;

use crate::ingest::sanitize_timestamp_ms;
use crate::model::{
    GamepadEvent, GamepadEventKind, InputData, KeyEventKind, KeyboardEvent, MouseEvent,
    MouseEventKind,
};

/// Raw input payloads come in two historical shapes, distinguished by the
/// presence of an `events` list versus per-device streams.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawInputPayload {
    /// Flat heterogeneous event list tagged by an `inputType` string.
    Events(RawEventList),
    /// Already split into canonical per-device streams.
    Canonical(RawCanonicalInputs),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventList {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub total_events: u64,
    pub events: Vec<RawInputEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInputEvent {
    #[serde(default)]
    pub timestamp_ms: f64,
    #[serde(default)]
    pub input_type: String,
    #[serde(default)]
    pub key_name: String,
    #[serde(default)]
    pub key_code: i32,
    #[serde(default)]
    pub screen_position: Option<Vec<f64>>,
    #[serde(default)]
    pub axis_value: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCanonicalInputs {
    #[serde(default)]
    pub keyboard: Vec<KeyboardEvent>,
    #[serde(default)]
    pub mouse: Vec<MouseEvent>,
    #[serde(default)]
    pub gamepad: Vec<RawCanonicalGamepadEvent>,
}

/// Canonical-shape gamepad events identify the control either by numeric
/// index or by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCanonicalGamepadEvent {
    #[serde(default)]
    pub timestamp_ms: f64,
    #[serde(rename = "type")]
    pub kind: GamepadEventKind,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub button: Option<String>,
    #[serde(default)]
    pub value: f64,
}

/// Normalize a raw input payload into canonical per-device streams, each
/// sorted ascending by timestamp. A missing payload yields empty streams.
pub fn normalize_inputs(payload: Option<RawInputPayload>) -> InputData {
    let mut data = match payload {
        None => InputData::default(),
        Some(RawInputPayload::Events(list)) => normalize_event_list(list),
        Some(RawInputPayload::Canonical(raw)) => normalize_canonical(raw),
    };

    data.keyboard
        .sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
    data.mouse
        .sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
    data.gamepad
        .sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
    data
}

fn normalize_event_list(list: RawEventList) -> InputData {
    let mut data = InputData::default();

    for event in list.events {
        let timestamp_ms = sanitize_timestamp_ms(event.timestamp_ms);

        // Keyboard events are matched by exact tag: other device types share
        // the "Key" prefix in some captures ("KeyRebind" and friends), so a
        // prefix match would misclassify them.
        match event.input_type.as_str() {
            "KeyDown" | "KeyUp" => {
                data.keyboard.push(KeyboardEvent {
                    timestamp_ms,
                    kind: if event.input_type == "KeyDown" {
                        KeyEventKind::Down
                    } else {
                        KeyEventKind::Up
                    },
                    key: event.key_name,
                    key_code: event.key_code,
                });
            }
            tag if tag.starts_with("Mouse") => {
                let kind = match tag {
                    "MouseButtonDown" => MouseEventKind::Down,
                    "MouseButtonUp" => MouseEventKind::Up,
                    _ => MouseEventKind::Move,
                };
                let button = match kind {
                    MouseEventKind::Down | MouseEventKind::Up => {
                        Some(map_mouse_button(&event.key_name))
                    }
                    _ => None,
                };
                let position = event.screen_position.unwrap_or_default();
                data.mouse.push(MouseEvent {
                    timestamp_ms,
                    kind,
                    button,
                    x: position.first().copied().unwrap_or(0.0),
                    y: position.get(1).copied().unwrap_or(0.0),
                    delta_x: None,
                    delta_y: None,
                });
            }
            tag if tag.starts_with("Gamepad") => {
                let kind = if tag.contains("Axis") {
                    GamepadEventKind::Axis
                } else {
                    GamepadEventKind::Button
                };
                // Digital button events carry no axis value; synthesize one
                // so press detection (`value > 0.5`) works uniformly.
                let value = event.axis_value.unwrap_or(match kind {
                    GamepadEventKind::Button if tag.ends_with("Down") => 1.0,
                    _ => 0.0,
                });
                data.gamepad.push(GamepadEvent {
                    timestamp_ms,
                    kind,
                    button: event.key_name,
                    value,
                });
            }
            _ => {}
        }
    }

    data
}

fn normalize_canonical(raw: RawCanonicalInputs) -> InputData {
    let keyboard = raw
        .keyboard
        .into_iter()
        .map(|mut e| {
            e.timestamp_ms = sanitize_timestamp_ms(e.timestamp_ms);
            e
        })
        .collect();

    let mouse = raw
        .mouse
        .into_iter()
        .map(|mut e| {
            e.timestamp_ms = sanitize_timestamp_ms(e.timestamp_ms);
            e
        })
        .collect();

    let gamepad = raw
        .gamepad
        .into_iter()
        .map(|e| GamepadEvent {
            timestamp_ms: sanitize_timestamp_ms(e.timestamp_ms),
            kind: e.kind,
            button: e.button.unwrap_or_else(|| match e.index {
                Some(index) => format!("Button{index}"),
                None => "Unknown".to_string(),
            }),
            value: e.value,
        })
        .collect();

    InputData {
        keyboard,
        mouse,
        gamepad,
    }
}

fn map_mouse_button(key_name: &str) -> u8 {
    match key_name {
        "LeftMouseButton" => 0,
        "RightMouseButton" => 2,
        _ => 1,
    }
}
