//! Normalization of raw artifact payloads into canonical typed sequences.
//!
//! Each data type arrives in one of two historical schemas; the raw payload
//! enums here pick the variant by structural shape, and one normalization
//! path per variant hides the difference from the rest of the system.
//! Missing artifacts normalize to empty structures; a viewer must stay
//! usable with partial capture data.

pub mod frames;
pub mod inputs;
pub mod logs;

pub use frames::{DEFAULT_TARGET_FPS, RawFrame, RawFrameList, RawFramePayload, normalize_frames};
pub use inputs::{RawEventList, RawInputEvent, RawInputPayload, normalize_inputs};
pub use logs::{LogFilter, parse_log_text};

/// Timestamps that are NaN or negative after parsing would corrupt clamping
/// and index lookups; fold them to 0.
pub(crate) fn sanitize_timestamp_ms(t_ms: f64) -> f64 {
    if t_ms.is_finite() && t_ms >= 0.0 { t_ms } else { 0.0 }
}
