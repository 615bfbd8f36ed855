pub mod bundle;
pub mod frame;
pub mod input;
pub mod log;

pub use bundle::{ArtifactType, Manifest, ManifestArtifact, Platform};
pub use frame::{FrameData, FrameSample, FrameSummary};
pub use input::{
    GamepadEvent, GamepadEventKind, InputData, KeyEventKind, KeyboardEvent, MouseEvent,
    MouseEventKind,
};
pub use log::{LogData, LogEntry, LogLevel};
