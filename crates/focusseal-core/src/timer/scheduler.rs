//! Deterministic timer scheduling.
//!
//! Stands in for UI-thread intervals and timeouts. Each [`TimerSlot`] holds at
//! most one armed timer; arming a slot replaces whatever was there. Nothing
//! fires on its own: the owner drains due timers with [`Scheduler::pop_due`],
//! which hands back the instant each timer was due so handlers can act "at"
//! that instant regardless of how late the drain happens.

use serde::{Deserialize, Serialize};

/// The independent timers the session machine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSlot {
    /// ~60 Hz progress tick while the hold gesture is charging.
    Charge,
    /// 1 s countdown tick during a running or break period.
    Countdown,
    /// One-shot delay between session completion and the automatic break.
    AutoBreak,
}

/// Identifies one arming of a slot. A handle from a cancelled or replaced
/// timer never compares equal to the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    pub slot: TimerSlot,
    id: u64,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub handle: TimerHandle,
    /// Epoch milliseconds at which the timer was due.
    pub due_ms: i64,
}

#[derive(Debug, Clone)]
struct Armed {
    handle: TimerHandle,
    due_ms: i64,
    period_ms: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_id: u64,
    armed: Vec<Armed>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a repeating timer first due at `from_ms + period_ms`.
    pub fn set_interval(&mut self, slot: TimerSlot, from_ms: i64, period_ms: i64) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.arm(slot, from_ms + period_ms, Some(period_ms))
    }

    /// Arm a one-shot timer due at `from_ms + delay_ms`.
    pub fn set_timeout(&mut self, slot: TimerSlot, from_ms: i64, delay_ms: i64) -> TimerHandle {
        self.arm(slot, from_ms + delay_ms.max(0), None)
    }

    /// Disarm the slot. Returns whether anything was armed.
    pub fn cancel(&mut self, slot: TimerSlot) -> bool {
        let before = self.armed.len();
        self.armed.retain(|a| a.handle.slot != slot);
        before != self.armed.len()
    }

    pub fn is_armed(&self, slot: TimerSlot) -> bool {
        self.armed.iter().any(|a| a.handle.slot == slot)
    }

    /// Earliest pending firing, if any.
    pub fn next_due(&self) -> Option<Firing> {
        self.armed
            .iter()
            .min_by_key(|a| (a.due_ms, a.handle.id))
            .map(|a| Firing {
                handle: a.handle,
                due_ms: a.due_ms,
            })
    }

    /// Take the earliest timer due at or before `now_ms`.
    ///
    /// Intervals are re-armed one period later; timeouts are removed.
    pub fn pop_due(&mut self, now_ms: i64) -> Option<Firing> {
        let firing = self.next_due().filter(|f| f.due_ms <= now_ms)?;
        let idx = self
            .armed
            .iter()
            .position(|a| a.handle == firing.handle)?;
        match self.armed[idx].period_ms {
            Some(period) => self.armed[idx].due_ms += period,
            None => {
                self.armed.remove(idx);
            }
        }
        Some(firing)
    }

    fn arm(&mut self, slot: TimerSlot, due_ms: i64, period_ms: Option<i64>) -> TimerHandle {
        self.cancel(slot);
        self.next_id += 1;
        let handle = TimerHandle {
            slot,
            id: self.next_id,
        };
        self.armed.push(Armed {
            handle,
            due_ms,
            period_ms,
        });
        handle
    }
}
