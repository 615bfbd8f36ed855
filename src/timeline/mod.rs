pub mod index;
pub mod metrics;
pub mod segments;

pub use index::{Timestamped, first_at_or_after, last_at_or_before};
pub use metrics::{STUTTER_THRESHOLD_FPS, summarize_frames};
pub use segments::{KeyHoldSegment, build_key_hold_segments};
