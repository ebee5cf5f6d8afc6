//! Session timer state machine.
//!
//! Owns the lifecycle of a focus session, the session history and the timer
//! settings. There are no internal threads: timers live in a [`Scheduler`]
//! and only fire when the caller invokes [`SessionTimer::pump`] (every
//! command pumps first, so overdue timers are always applied before a
//! gesture).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Charging -> Running -> Idle -(500ms)-> Break -> Idle
//!            |           |                        |
//!            +-> Idle    +-> Idle (sealed)        +-> Idle (sealed/skipped)
//!
//! Running | Break <-> Paused
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = SessionTimer::load(store, SystemClock, SilentFeedback);
//! timer.begin_charge();
//! // In a loop:
//! for event in timer.pump() { /* render */ }
//! ```

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::clock::{from_ms, Clock};
use super::feedback::{Chime, Feedback, HapticPattern};
use super::scheduler::{Scheduler, TimerSlot};
use super::session::{parse_sessions, Export, HistoryStats, Session};
use super::settings::{Preset, SettingsPatch, TimerSettings};
use crate::error::Result;
use crate::events::Event;
use crate::storage::{KvStore, SESSIONS_KEY, SETTINGS_KEY};

/// How long the hold gesture must last before a run starts.
pub const CHARGE_THRESHOLD_MS: i64 = 2_500;
/// Charge progress refresh period (~60 Hz).
pub const CHARGE_TICK_MS: i64 = 16;
pub const COUNTDOWN_TICK_MS: i64 = 1_000;
/// Delay between a completed session and its automatic break.
pub const AUTO_BREAK_DELAY_MS: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Charging,
    Running,
    Break,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Break,
}

#[derive(Debug, Clone)]
struct Charge {
    started_ms: i64,
    progress: f64,
    /// Highest quarter mark already announced.
    quarters: u8,
}

/// The running or break period currently counting down (or paused).
#[derive(Debug, Clone)]
struct Period {
    phase: Phase,
    preset: Preset,
    started_at: DateTime<Utc>,
    duration_min: u32,
    remaining_secs: u64,
}

impl Period {
    fn total_secs(&self) -> u64 {
        u64::from(self.duration_min) * 60
    }
}

/// Display-ready view of the timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: TimerState,
    pub preset: Preset,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub progress: f64,
    pub charge_progress: f64,
    pub display: String,
}

pub struct SessionTimer {
    settings: TimerSettings,
    sessions: Vec<Session>,
    state: TimerState,
    preset: Preset,
    charge: Option<Charge>,
    period: Option<Period>,
    scheduler: Scheduler,
    clock: Box<dyn Clock>,
    store: Box<dyn KvStore>,
    feedback: Box<dyn Feedback>,
}

impl SessionTimer {
    /// Build a timer from persisted settings and history.
    ///
    /// Missing or malformed values are replaced by defaults (settings) or an
    /// empty history; the problem is logged, never returned.
    pub fn load(
        store: impl KvStore + 'static,
        clock: impl Clock + 'static,
        feedback: impl Feedback + 'static,
    ) -> Self {
        let settings: TimerSettings = load_or_default(&store, SETTINGS_KEY);
        let sessions: Vec<Session> = load_or_default(&store, SESSIONS_KEY);
        tracing::debug!(sessions = sessions.len(), "session timer loaded");
        Self {
            settings,
            sessions,
            state: TimerState::Idle,
            preset: Preset::default(),
            charge: None,
            period: None,
            scheduler: Scheduler::new(),
            clock: Box::new(clock),
            store: Box::new(store),
            feedback: Box::new(feedback),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// History, newest first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Seconds left in the current running or break period; 0 without one.
    pub fn remaining_seconds(&self) -> u64 {
        self.period.as_ref().map_or(0, |p| p.remaining_secs)
    }

    pub fn total_seconds(&self) -> u64 {
        self.period.as_ref().map_or(0, Period::total_secs)
    }

    /// 0.0 .. 1.0 elapsed fraction of the current period.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_seconds() as f64 / total as f64)
    }

    /// 0.0 .. 1.0 while charging, 0.0 otherwise.
    pub fn charge_progress(&self) -> f64 {
        self.charge.as_ref().map_or(0.0, |c| c.progress)
    }

    /// Time left formatted for display. Without a period, shows the length
    /// the selected preset would run for.
    pub fn display(&self) -> String {
        let secs = match &self.period {
            Some(p) => p.remaining_secs,
            None => u64::from(self.settings.duration_min(self.preset)) * 60,
        };
        if self.settings.show_minutes_remaining {
            format!("{} min", secs.div_ceil(60))
        } else {
            format!("{:02}:{:02}", secs / 60, secs % 60)
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            preset: self.preset,
            remaining_seconds: self.remaining_seconds(),
            total_seconds: self.total_seconds(),
            progress: self.progress(),
            charge_progress: self.charge_progress(),
            display: self.display(),
        }
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_sessions(&self.sessions, self.clock.now())
    }

    /// Whether an automatic break is waiting out its delay.
    pub fn break_pending(&self) -> bool {
        self.scheduler.is_armed(TimerSlot::AutoBreak)
    }

    /// Current time on the timer's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// When the next timer is due, if any is armed.
    pub fn next_wakeup(&self) -> Option<DateTime<Utc>> {
        self.scheduler.next_due().map(|f| from_ms(f.due_ms))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Choose the preset for the next run. Only accepted while idle.
    pub fn select_preset(&mut self, preset: Preset) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.preset = preset;
        true
    }

    /// Hold gesture started.
    pub fn begin_charge(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        if self.state != TimerState::Idle {
            return events;
        }
        if self.scheduler.cancel(TimerSlot::AutoBreak) {
            tracing::debug!("pending break dropped by new charge");
        }

        let now = self.clock.now_ms();
        self.charge = Some(Charge {
            started_ms: now,
            progress: 0.0,
            quarters: 0,
        });
        self.state = TimerState::Charging;
        self.scheduler
            .set_interval(TimerSlot::Charge, now, CHARGE_TICK_MS);
        self.vibrate(HapticPattern::ChargeStart);
        events.push(Event::ChargeStarted {
            preset: self.preset,
            at: from_ms(now),
        });
        events
    }

    /// Hold gesture released. Cancels the charge unless the hold has lasted
    /// at least [`CHARGE_THRESHOLD_MS`], in which case the run is already
    /// under way.
    pub fn release_charge(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        if self.state != TimerState::Charging {
            return events;
        }
        self.scheduler.cancel(TimerSlot::Charge);
        let progress = self.charge.take().map_or(0.0, |c| c.progress);
        self.state = TimerState::Idle;
        tracing::debug!(progress, "charge released early");
        events.push(Event::ChargeCancelled {
            progress,
            at: self.clock.now(),
        });
        events
    }

    /// Start a break by hand from idle.
    pub fn start_break(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        if self.state == TimerState::Idle {
            self.scheduler.cancel(TimerSlot::AutoBreak);
            let now = self.clock.now_ms();
            self.enter_break(now, &mut events);
        }
        events
    }

    /// End the running or break period early. A running period is recorded
    /// as an incomplete session of its nominal length; a break leaves no record.
    pub fn seal(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        let sealable = matches!(
            self.state,
            TimerState::Running | TimerState::Break | TimerState::Paused
        );
        if !sealable {
            return events;
        }
        let Some(period) = self.period.take() else {
            return events;
        };

        self.scheduler.cancel(TimerSlot::Countdown);
        self.state = TimerState::Idle;
        let at = self.clock.now();
        self.vibrate(HapticPattern::Seal);
        events.push(Event::PeriodSealed {
            was_break: period.phase == Phase::Break,
            remaining_secs: period.remaining_secs,
            at,
        });

        if period.phase == Phase::Running {
            let session = Session::record(
                period.started_at,
                at,
                period.duration_min,
                period.preset,
                false,
            );
            self.push_session(session, &mut events);
        }
        events
    }

    /// End the current break, or drop a pending automatic one.
    pub fn skip_break(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        let in_break = self
            .period
            .as_ref()
            .is_some_and(|p| p.phase == Phase::Break);

        if in_break {
            self.scheduler.cancel(TimerSlot::Countdown);
            self.period = None;
            self.state = TimerState::Idle;
        } else if !self.scheduler.cancel(TimerSlot::AutoBreak) {
            return events;
        }
        events.push(Event::BreakEnded {
            skipped: true,
            at: self.clock.now(),
        });
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        if !matches!(self.state, TimerState::Running | TimerState::Break) {
            return events;
        }
        self.scheduler.cancel(TimerSlot::Countdown);
        self.state = TimerState::Paused;
        events.push(Event::TimerPaused {
            remaining_secs: self.remaining_seconds(),
            at: self.clock.now(),
        });
        events
    }

    /// Continue a paused period; the next tick lands one second from now.
    pub fn resume(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        if self.state != TimerState::Paused {
            return events;
        }
        let Some(phase) = self.period.as_ref().map(|p| p.phase) else {
            self.state = TimerState::Idle;
            return events;
        };
        let now = self.clock.now_ms();
        self.state = match phase {
            Phase::Running => TimerState::Running,
            Phase::Break => TimerState::Break,
        };
        self.scheduler
            .set_interval(TimerSlot::Countdown, now, COUNTDOWN_TICK_MS);
        events.push(Event::TimerResumed {
            remaining_secs: self.remaining_seconds(),
            at: from_ms(now),
        });
        events
    }

    /// Fire every timer due at or before the clock's current time.
    ///
    /// The charge threshold is its own deadline: a hold that reached it
    /// starts the run at that instant, whether or not a progress tick
    /// happened to land there.
    pub fn pump(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        loop {
            let next_due = self.scheduler.next_due().map(|f| f.due_ms);
            if let Some(deadline) = self.charge_deadline().filter(|&d| d <= now) {
                if next_due.map_or(true, |due| deadline <= due) {
                    self.on_charge_tick(deadline, &mut events);
                    continue;
                }
            }
            let Some(firing) = self.scheduler.pop_due(now) else {
                break;
            };
            match firing.handle.slot {
                TimerSlot::Charge => self.on_charge_tick(firing.due_ms, &mut events),
                TimerSlot::Countdown => self.on_countdown_tick(firing.due_ms, &mut events),
                TimerSlot::AutoBreak => {
                    if self.state == TimerState::Idle {
                        self.enter_break(firing.due_ms, &mut events);
                    }
                }
            }
        }
        events
    }

    /// Merge `patch` into the settings and persist the whole object.
    ///
    /// A period already counting down keeps the length it started with.
    ///
    /// # Errors
    /// Returns a validation error (settings untouched) for zero durations,
    /// or a storage error if the write fails (settings already applied).
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<Event> {
        patch.validate()?;
        self.settings.merge(patch);
        self.persist_settings()?;
        Ok(Event::SettingsUpdated {
            settings: self.settings.clone(),
        })
    }

    /// Serialize the whole history, named after today's date.
    pub fn export_sessions(&self) -> Result<Export> {
        Ok(Export::new(&self.sessions, self.clock.now())?)
    }

    /// Prepend sessions from a JSON array. Returns `false` and changes
    /// nothing if the payload does not parse.
    pub fn import_sessions(&mut self, json: &str) -> bool {
        let imported = match parse_sessions(json) {
            Ok(imported) => imported,
            Err(e) => {
                tracing::warn!(error = %e, "rejected session import");
                return false;
            }
        };
        let count = imported.len();
        let mut merged = imported;
        merged.append(&mut self.sessions);
        self.sessions = merged;
        if let Err(e) = self.persist_sessions() {
            tracing::warn!(error = %e, "imported sessions not persisted");
        }
        tracing::info!(count, "imported sessions");
        true
    }

    pub fn clear_history(&mut self) -> Result<Event> {
        self.sessions.clear();
        self.persist_sessions()?;
        tracing::info!("session history cleared");
        Ok(Event::HistoryCleared)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Instant the current hold reaches the threshold.
    fn charge_deadline(&self) -> Option<i64> {
        self.charge
            .as_ref()
            .map(|c| c.started_ms + CHARGE_THRESHOLD_MS)
    }

    fn on_charge_tick(&mut self, at_ms: i64, events: &mut Vec<Event>) {
        let Some(charge) = self.charge.as_mut() else {
            self.scheduler.cancel(TimerSlot::Charge);
            return;
        };

        let elapsed = (at_ms - charge.started_ms).max(0);
        let progress = (elapsed as f64 / CHARGE_THRESHOLD_MS as f64).min(1.0);
        charge.progress = charge.progress.max(progress);

        let reached = ((charge.progress * 4.0).floor() as u8).min(3);
        let first_new = charge.quarters + 1;
        charge.quarters = charge.quarters.max(reached);
        let complete = charge.progress >= 1.0;

        for quarter in first_new..=reached {
            self.vibrate(HapticPattern::ChargeStep(quarter));
            events.push(Event::ChargeStep {
                quarter,
                at: from_ms(at_ms),
            });
        }
        if complete {
            self.start_run(at_ms, events);
        }
    }

    fn start_run(&mut self, at_ms: i64, events: &mut Vec<Event>) {
        self.scheduler.cancel(TimerSlot::Charge);
        self.charge = None;

        let duration_min = self.settings.duration_min(self.preset);
        let period = Period {
            phase: Phase::Running,
            preset: self.preset,
            started_at: from_ms(at_ms),
            duration_min,
            remaining_secs: u64::from(duration_min) * 60,
        };
        let duration_secs = period.total_secs();
        self.period = Some(period);
        self.state = TimerState::Running;
        self.scheduler
            .set_interval(TimerSlot::Countdown, at_ms, COUNTDOWN_TICK_MS);
        self.vibrate(HapticPattern::RunStart);
        tracing::debug!(preset = %self.preset, duration_secs, "run started");
        events.push(Event::RunStarted {
            preset: self.preset,
            duration_secs,
            at: from_ms(at_ms),
        });
    }

    fn on_countdown_tick(&mut self, at_ms: i64, events: &mut Vec<Event>) {
        let Some(period) = self.period.as_mut() else {
            self.scheduler.cancel(TimerSlot::Countdown);
            return;
        };
        period.remaining_secs = period.remaining_secs.saturating_sub(1);
        if period.remaining_secs > 0 {
            return;
        }
        let phase = period.phase;
        match phase {
            Phase::Running => self.complete_run(at_ms, events),
            Phase::Break => self.complete_break(at_ms, events),
        }
    }

    fn complete_run(&mut self, at_ms: i64, events: &mut Vec<Event>) {
        self.scheduler.cancel(TimerSlot::Countdown);
        let Some(period) = self.period.take() else {
            return;
        };
        self.state = TimerState::Idle;

        let session = Session::record(
            period.started_at,
            from_ms(at_ms),
            period.duration_min,
            period.preset,
            true,
        );
        self.push_session(session, events);
        self.vibrate(HapticPattern::SessionComplete);
        self.chime(Chime::SessionComplete);

        if self.settings.auto_start_break {
            self.scheduler
                .set_timeout(TimerSlot::AutoBreak, at_ms, AUTO_BREAK_DELAY_MS);
            events.push(Event::BreakScheduled {
                starts_at: from_ms(at_ms + AUTO_BREAK_DELAY_MS),
            });
        }
    }

    fn enter_break(&mut self, at_ms: i64, events: &mut Vec<Event>) {
        let duration_min = self.settings.break_duration;
        let period = Period {
            phase: Phase::Break,
            preset: self.preset,
            started_at: from_ms(at_ms),
            duration_min,
            remaining_secs: u64::from(duration_min) * 60,
        };
        let duration_secs = period.total_secs();
        self.period = Some(period);
        self.state = TimerState::Break;
        self.scheduler
            .set_interval(TimerSlot::Countdown, at_ms, COUNTDOWN_TICK_MS);
        self.vibrate(HapticPattern::BreakStart);
        tracing::debug!(duration_secs, "break started");
        events.push(Event::BreakStarted {
            duration_secs,
            at: from_ms(at_ms),
        });
    }

    fn complete_break(&mut self, at_ms: i64, events: &mut Vec<Event>) {
        self.scheduler.cancel(TimerSlot::Countdown);
        self.period = None;
        self.state = TimerState::Idle;
        self.vibrate(HapticPattern::BreakComplete);
        self.chime(Chime::BreakComplete);
        events.push(Event::BreakEnded {
            skipped: false,
            at: from_ms(at_ms),
        });
    }

    fn push_session(&mut self, session: Session, events: &mut Vec<Event>) {
        tracing::info!(
            id = %session.id,
            preset = %session.preset,
            completed = session.completed,
            "session recorded"
        );
        self.sessions.insert(0, session.clone());
        if let Err(e) = self.persist_sessions() {
            tracing::warn!(error = %e, "session history not persisted");
        }
        events.push(Event::SessionRecorded { session });
    }

    fn persist_settings(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.settings)?;
        self.store.set(SETTINGS_KEY, &json)?;
        Ok(())
    }

    fn persist_sessions(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.sessions)?;
        self.store.set(SESSIONS_KEY, &json)?;
        Ok(())
    }

    fn vibrate(&mut self, pattern: HapticPattern) {
        if self.settings.vibration_enabled {
            self.feedback.vibrate(pattern);
        }
    }

    fn chime(&mut self, chime: Chime) {
        if self.settings.sound_enabled {
            self.feedback.chime(chime);
        }
    }
}

fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KvStore, key: &str) -> T {
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "discarding malformed persisted value");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "persisted value unreadable");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::timer::clock::ManualClock;
    use crate::timer::feedback::{RecordingFeedback, Signal};

    fn timer_with(store: MemoryStore) -> (SessionTimer, ManualClock, RecordingFeedback) {
        let clock = ManualClock::fixed();
        let feedback = RecordingFeedback::new();
        let timer = SessionTimer::load(store, clock.clone(), feedback.clone());
        (timer, clock, feedback)
    }

    fn timer() -> (SessionTimer, ManualClock, RecordingFeedback) {
        timer_with(MemoryStore::new())
    }

    fn charge_fully(timer: &mut SessionTimer, clock: &ManualClock) {
        timer.begin_charge();
        clock.advance_ms(CHARGE_THRESHOLD_MS + CHARGE_TICK_MS);
        timer.pump();
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn charge_progress_is_monotonic_and_resets_on_release() {
        let (mut timer, clock, _) = timer();
        timer.begin_charge();
        assert_eq!(timer.state(), TimerState::Charging);
        assert_eq!(timer.charge_progress(), 0.0);

        let mut last = 0.0;
        for _ in 0..100 {
            clock.advance_ms(20);
            timer.pump();
            let p = timer.charge_progress();
            assert!(p >= last);
            last = p;
        }
        assert!(last > 0.7 && last < 1.0);

        let events = timer.release_charge();
        assert!(matches!(events.last(), Some(Event::ChargeCancelled { .. })));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.charge_progress(), 0.0);
        assert!(timer.next_wakeup().is_none());
    }

    #[test]
    fn release_after_threshold_keeps_the_run() {
        let (mut timer, clock, _) = timer();
        timer.begin_charge();
        clock.advance_ms(3_000);
        let events = timer.release_charge();
        let starts = events
            .iter()
            .filter(|e| matches!(e, Event::RunStarted { .. }))
            .count();
        assert_eq!(starts, 1);
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn release_at_exact_threshold_starts_the_run() {
        for hold_ms in [CHARGE_THRESHOLD_MS, CHARGE_THRESHOLD_MS + 10] {
            let (mut timer, clock, _) = timer();
            timer.begin_charge();
            clock.advance_ms(hold_ms);
            let events = timer.release_charge();

            assert_eq!(timer.state(), TimerState::Running, "hold of {hold_ms}ms");
            assert!(events
                .iter()
                .any(|e| matches!(e, Event::RunStarted { .. })));
            assert!(!events
                .iter()
                .any(|e| matches!(e, Event::ChargeCancelled { .. })));
        }
    }

    #[test]
    fn run_is_anchored_at_the_threshold_instant() {
        let (mut timer, clock, _) = timer();
        let start = timer.now();
        timer.begin_charge();
        clock.advance_ms(CHARGE_THRESHOLD_MS);
        let events = timer.pump();

        let started_at = events.iter().find_map(|e| match e {
            Event::RunStarted { at, .. } => Some(*at),
            _ => None,
        });
        assert_eq!(
            started_at,
            Some(start + chrono::Duration::milliseconds(CHARGE_THRESHOLD_MS))
        );
        assert_eq!(
            timer.next_wakeup(),
            Some(timer.now() + chrono::Duration::milliseconds(COUNTDOWN_TICK_MS))
        );
    }

    #[test]
    fn release_just_short_of_threshold_cancels() {
        let (mut timer, clock, _) = timer();
        timer.begin_charge();
        clock.advance_ms(CHARGE_THRESHOLD_MS - 1);
        let events = timer.release_charge();
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(matches!(events.last(), Some(Event::ChargeCancelled { .. })));
    }

    #[test]
    fn charge_quarters_pulse_once_each() {
        let (mut timer, clock, feedback) = timer();
        timer.begin_charge();
        for _ in 0..400 {
            clock.advance_ms(7);
            timer.pump();
        }
        assert_eq!(
            feedback.vibrations(),
            vec![
                HapticPattern::ChargeStart,
                HapticPattern::ChargeStep(1),
                HapticPattern::ChargeStep(2),
                HapticPattern::ChargeStep(3),
                HapticPattern::RunStart,
            ]
        );
    }

    #[test]
    fn run_uses_selected_preset_duration() {
        let (mut timer, clock, _) = timer();
        assert!(timer.select_preset(Preset::Deep));
        charge_fully(&mut timer, &clock);
        assert_eq!(timer.remaining_seconds(), 50 * 60);
        assert_eq!(timer.total_seconds(), 50 * 60);
        assert!(!timer.select_preset(Preset::Quick));
        assert_eq!(timer.preset(), Preset::Deep);
    }

    #[test]
    fn seal_records_incomplete_session_with_nominal_length() {
        let (mut timer, clock, feedback) = timer();
        charge_fully(&mut timer, &clock);
        clock.advance_ms(90_000);
        let events = timer.seal();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.sessions().len(), 1);
        let session = &timer.sessions()[0];
        assert!(!session.completed);
        assert_eq!(session.duration_minutes, 25);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::PeriodSealed { was_break: false, .. })));
        assert_eq!(feedback.vibrations().last(), Some(&HapticPattern::Seal));
    }

    #[test]
    fn sealing_a_break_records_nothing() {
        let (mut timer, _, _) = timer();
        timer.start_break();
        assert_eq!(timer.state(), TimerState::Break);
        assert_eq!(timer.remaining_seconds(), 300);
        timer.seal();
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.sessions().is_empty());
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let (mut timer, clock, _) = timer();
        charge_fully(&mut timer, &clock);
        clock.advance_ms(10_000);
        timer.pause();
        let frozen = timer.remaining_seconds();
        assert_eq!(timer.state(), TimerState::Paused);

        clock.advance_ms(60_000);
        timer.pump();
        assert_eq!(timer.remaining_seconds(), frozen);

        timer.resume();
        assert_eq!(timer.state(), TimerState::Running);
        clock.advance_ms(1_000);
        timer.pump();
        assert_eq!(timer.remaining_seconds(), frozen - 1);
    }

    #[test]
    fn seal_while_paused_records_interrupted_run() {
        let (mut timer, clock, _) = timer();
        charge_fully(&mut timer, &clock);
        timer.pause();
        timer.seal();
        assert_eq!(timer.sessions().len(), 1);
        assert!(!timer.sessions()[0].completed);
    }

    #[test]
    fn completion_without_auto_break_returns_to_idle() {
        let store = MemoryStore::new().with_entry(
            SETTINGS_KEY,
            r#"{"quickDuration":1,"autoStartBreak":false}"#,
        );
        let (mut timer, clock, feedback) = timer_with(store);
        timer.select_preset(Preset::Quick);
        charge_fully(&mut timer, &clock);
        clock.advance_ms(60_000 + AUTO_BREAK_DELAY_MS);
        timer.pump();
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(!timer.break_pending());
        assert_eq!(timer.sessions().len(), 1);
        assert!(feedback
            .signals()
            .contains(&Signal::Chime(Chime::SessionComplete)));
    }

    #[test]
    fn skip_break_drops_pending_auto_break() {
        let store = MemoryStore::new().with_entry(SETTINGS_KEY, r#"{"quickDuration":1}"#);
        let (mut timer, clock, _) = timer_with(store);
        timer.select_preset(Preset::Quick);
        charge_fully(&mut timer, &clock);
        clock.advance_ms(60_000);
        timer.pump();
        assert!(timer.break_pending());

        let events = timer.skip_break();
        assert!(matches!(events.last(), Some(Event::BreakEnded { skipped: true, .. })));
        clock.advance_ms(AUTO_BREAK_DELAY_MS);
        timer.pump();
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn disabled_feedback_stays_silent() {
        let store = MemoryStore::new().with_entry(
            SETTINGS_KEY,
            r#"{"vibrationEnabled":false,"soundEnabled":false}"#,
        );
        let (mut timer, clock, feedback) = timer_with(store);
        charge_fully(&mut timer, &clock);
        timer.seal();
        assert!(feedback.signals().is_empty());
    }

    #[test]
    fn malformed_persisted_values_fall_back() {
        let store = MemoryStore::new()
            .with_entry(SETTINGS_KEY, "{broken")
            .with_entry(SESSIONS_KEY, r#"{"not":"a list"}"#);
        let (timer, _, _) = timer_with(store);
        assert_eq!(timer.settings(), &TimerSettings::default());
        assert!(timer.sessions().is_empty());
    }

    #[test]
    fn update_settings_rejects_zero_duration() {
        let (mut timer, _, _) = timer();
        let patch = SettingsPatch {
            quick_duration: Some(0),
            ..Default::default()
        };
        assert!(timer.update_settings(&patch).is_err());
        assert_eq!(timer.settings().quick_duration, 10);
    }

    #[test]
    fn display_follows_minutes_setting() {
        let (mut timer, clock, _) = timer();
        assert_eq!(timer.display(), "25:00");
        charge_fully(&mut timer, &clock);
        clock.advance_ms(1_000);
        timer.pump();
        assert_eq!(timer.display(), "24:59");
        timer
            .update_settings(&SettingsPatch {
                show_minutes_remaining: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(timer.display(), "25 min");
    }

    #[test]
    fn snapshot_reports_progress() {
        let (mut timer, clock, _) = timer();
        charge_fully(&mut timer, &clock);
        clock.advance_ms(COUNTDOWN_TICK_MS * 150);
        timer.pump();
        let snap = timer.snapshot();
        assert_eq!(snap.state, TimerState::Running);
        assert_eq!(snap.remaining_seconds, 1_350);
        assert!((snap.progress - 0.1).abs() < 1e-9);
        assert_eq!(snap.charge_progress, 0.0);
    }
}
