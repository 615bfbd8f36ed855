pub mod clock;
pub mod device;
pub mod session;
pub mod shortcuts;
pub mod signal;

pub use clock::{ManualClock, MonotonicClock, WallClock};
pub use device::{DeviceEvent, PlaybackDevice};
pub use session::ViewerSession;
pub use shortcuts::{KeyChord, ShortcutKey, ShortcutMap, TransportAction};
pub use signal::{SubscriptionId, TimeSignal, TimeState};
