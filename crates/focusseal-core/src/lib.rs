//! # focusseal Core Library
//!
//! Business logic for the focusseal focus timer. Front ends (the bundled CLI,
//! or any UI) drive a single [`SessionTimer`] and render what it reports.
//!
//! ## Architecture
//!
//! - **Session Timer**: a state machine (idle, charging, running, break,
//!   paused) whose timers live in an explicit [`Scheduler`] and fire only when
//!   the caller pumps it
//! - **Seams**: time comes from a [`Clock`], haptics and sounds go out through
//!   [`Feedback`], persistence goes through a [`KvStore`]
//! - **Storage**: SQLite-backed key-value store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine and session history
//! - [`SqliteStore`]: Settings and history persistence
//! - [`Config`]: Host configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use storage::{Config, KvStore, MemoryStore, SqliteStore};
pub use timer::{
    Clock, Export, Feedback, HistoryStats, ManualClock, Preset, Scheduler, Session,
    SessionTimer, SettingsPatch, SilentFeedback, Snapshot, SystemClock, TimerSettings,
    TimerState,
};
