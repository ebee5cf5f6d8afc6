mod clock;
mod engine;
mod feedback;
mod scheduler;
mod session;
mod settings;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    SessionTimer, Snapshot, TimerState, AUTO_BREAK_DELAY_MS, CHARGE_THRESHOLD_MS,
    CHARGE_TICK_MS, COUNTDOWN_TICK_MS,
};
pub use feedback::{Chime, Feedback, HapticPattern, RecordingFeedback, Signal, SilentFeedback};
pub use scheduler::{Firing, Scheduler, TimerHandle, TimerSlot};
pub use session::{export_file_name, parse_sessions, Export, HistoryStats, Session};
pub use settings::{Preset, SettingsPatch, TimerSettings};
