use std::io::Write;

use clap::Subcommand;
use focusseal_core::timer::{Chime, Feedback, HapticPattern, Session};
use focusseal_core::{Config, Event, Preset, SessionTimer, Snapshot, TimerState};
use serde::Serialize;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Hold the charge and run a session in the foreground
    Run {
        /// Duration tier: quick, standard or deep
        #[arg(long, default_value = "standard")]
        preset: Preset,
        /// Do not take the automatic break after the session
        #[arg(long)]
        skip_break: bool,
    },
    /// Print timer state, next run length and recent history as JSON
    Status {
        /// Preset the next run would use
        #[arg(long, default_value = "standard")]
        preset: Preset,
    },
}

/// `timer status` output: the idle snapshot plus what a run would look like
/// and what the last one was.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Status<'a> {
    #[serde(flatten)]
    snapshot: Snapshot,
    next_run_minutes: u32,
    break_minutes: u32,
    last_session: Option<&'a Session>,
    today_sessions: u64,
    today_focus_min: u64,
}

/// Terminal stand-in for the device: no vibration motor, chimes ring the bell.
pub struct TerminalFeedback;

impl Feedback for TerminalFeedback {
    fn vibrate(&mut self, pattern: HapticPattern) {
        tracing::trace!(?pattern, "vibration requested");
    }

    fn chime(&mut self, _chime: Chime) {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = super::open_timer(config)?;

    match action {
        TimerAction::Run { preset, skip_break } => run_live(&mut timer, preset, skip_break)?,
        TimerAction::Status { preset } => {
            timer.select_preset(preset);
            let stats = timer.stats();
            let status = Status {
                snapshot: timer.snapshot(),
                next_run_minutes: timer.settings().duration_min(preset),
                break_minutes: timer.settings().break_duration,
                last_session: timer.sessions().first(),
                today_sessions: stats.today_sessions,
                today_focus_min: stats.today_focus_min,
            };
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

/// Sleep until each armed timer is due and pump, until nothing is left armed.
fn run_live(
    timer: &mut SessionTimer,
    preset: Preset,
    skip_break: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    timer.select_preset(preset);
    report(&timer.begin_charge());

    while let Some(next) = timer.next_wakeup() {
        let wait = (next - timer.now()).to_std().unwrap_or_default();
        std::thread::sleep(wait);

        let events = timer.pump();
        let scheduled = events
            .iter()
            .any(|e| matches!(e, Event::BreakScheduled { .. }));
        report(&events);
        if skip_break && scheduled {
            report(&timer.skip_break());
        }
        render_status(timer)?;
    }
    println!();
    Ok(())
}

fn render_status(timer: &SessionTimer) -> std::io::Result<()> {
    let line = match timer.state() {
        TimerState::Charging => format!("charging {:>3.0}%", timer.charge_progress() * 100.0),
        TimerState::Running => format!("focus  {}", timer.display()),
        TimerState::Break => format!("break  {}", timer.display()),
        TimerState::Idle | TimerState::Paused => return Ok(()),
    };
    let mut out = std::io::stdout();
    write!(out, "\r{line:<20}")?;
    out.flush()
}

fn report(events: &[Event]) {
    for event in events {
        let line = match event {
            Event::RunStarted { preset, duration_secs, .. } => {
                format!("{preset} session started ({} min)", duration_secs / 60)
            }
            Event::SessionRecorded { session } if session.completed => {
                format!("session complete ({} min)", session.duration_minutes)
            }
            Event::BreakStarted { duration_secs, .. } => {
                format!("break started ({} min)", duration_secs / 60)
            }
            Event::BreakEnded { skipped: true, .. } => "break skipped".to_string(),
            Event::BreakEnded { skipped: false, .. } => "break over".to_string(),
            _ => continue,
        };
        println!("\r{line:<40}");
    }
}
