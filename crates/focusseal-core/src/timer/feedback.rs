//! Haptic and sound feedback.
//!
//! Feedback is fire-and-forget: the timer never learns whether a pulse or
//! chime actually happened, and implementations swallow their own failures
//! (including running on hardware with no vibration motor).

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Vibration patterns, one per moment the timer signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    /// Hold gesture began.
    ChargeStart,
    /// Charge crossed a quarter mark (1 = 25 %, 2 = 50 %, 3 = 75 %).
    ChargeStep(u8),
    RunStart,
    /// Period ended early by the user.
    Seal,
    SessionComplete,
    BreakStart,
    BreakComplete,
}

impl HapticPattern {
    /// Alternating vibrate/pause durations in milliseconds, starting with a vibrate.
    pub fn pulses(&self) -> &'static [u64] {
        match self {
            HapticPattern::ChargeStart => &[10],
            HapticPattern::ChargeStep(1) => &[15],
            HapticPattern::ChargeStep(2) => &[25],
            HapticPattern::ChargeStep(_) => &[40],
            HapticPattern::RunStart => &[50, 50, 100],
            HapticPattern::Seal => &[100, 50, 100, 50, 100],
            HapticPattern::SessionComplete => &[200, 100, 200, 100, 400],
            HapticPattern::BreakStart => &[30, 30, 30],
            HapticPattern::BreakComplete => &[100, 100, 300],
        }
    }
}

/// Sounds requested when `sound_enabled` is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chime {
    SessionComplete,
    BreakComplete,
}

pub trait Feedback {
    fn vibrate(&mut self, pattern: HapticPattern);

    fn chime(&mut self, _chime: Chime) {}
}

/// Host without haptics or audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn vibrate(&mut self, pattern: HapticPattern) {
        tracing::trace!(?pattern, "vibration unavailable");
    }
}

/// Something the timer asked the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Vibrate(HapticPattern),
    Chime(Chime),
}

/// Records every request. Clones share the same log, so a test can keep one
/// clone while the timer owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    log: Arc<Mutex<Vec<Signal>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn vibrations(&self) -> Vec<HapticPattern> {
        self.signals()
            .into_iter()
            .filter_map(|s| match s {
                Signal::Vibrate(p) => Some(p),
                Signal::Chime(_) => None,
            })
            .collect()
    }

    fn push(&self, signal: Signal) {
        if let Ok(mut log) = self.log.lock() {
            log.push(signal);
        }
    }
}

impl Feedback for RecordingFeedback {
    fn vibrate(&mut self, pattern: HapticPattern) {
        self.push(Signal::Vibrate(pattern));
    }

    fn chime(&mut self, chime: Chime) {
        self.push(Signal::Chime(chime));
    }
}
