use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Preset, Session, TimerSettings};

/// Every state change in the timer produces an Event.
/// The UI polls snapshots for display and reacts to events for transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ChargeStarted {
        preset: Preset,
        at: DateTime<Utc>,
    },
    /// Charge progress crossed a quarter mark (1..=3).
    ChargeStep {
        quarter: u8,
        at: DateTime<Utc>,
    },
    /// Hold released before the threshold.
    ChargeCancelled {
        progress: f64,
        at: DateTime<Utc>,
    },
    RunStarted {
        preset: Preset,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        session: Session,
    },
    /// Running or break period ended early by the user.
    PeriodSealed {
        was_break: bool,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Automatic break armed; starts at `starts_at`.
    BreakScheduled {
        starts_at: DateTime<Utc>,
    },
    BreakStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    BreakEnded {
        skipped: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
    },
    HistoryCleared,
}
