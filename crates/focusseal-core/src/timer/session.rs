//! Session records and history helpers.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::settings::Preset;

/// One finished or interrupted running period.
///
/// Timestamps serialize as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    /// Nominal preset length, also for interrupted sessions.
    pub duration_minutes: u32,
    pub preset: Preset,
    pub completed: bool,
}

impl Session {
    pub(crate) fn record(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        duration_minutes: u32,
        preset: Preset,
        completed: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start_time,
            end_time,
            duration_minutes,
            preset,
            completed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub interrupted_sessions: u64,
    /// Minutes of completed sessions.
    pub focus_min: u64,
    pub today_sessions: u64,
    pub today_focus_min: u64,
}

impl HistoryStats {
    /// Aggregate `sessions`, counting "today" by the UTC date of `now`.
    pub fn from_sessions(sessions: &[Session], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut stats = Self::default();
        for s in sessions {
            stats.total_sessions += 1;
            let is_today = s.end_time.date_naive() == today;
            if is_today {
                stats.today_sessions += 1;
            }
            if s.completed {
                stats.completed_sessions += 1;
                stats.focus_min += u64::from(s.duration_minutes);
                if is_today {
                    stats.today_focus_min += u64::from(s.duration_minutes);
                }
            } else {
                stats.interrupted_sessions += 1;
            }
        }
        stats
    }
}

/// Serialized history, ready to be saved or handed to a share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

impl Export {
    pub(crate) fn new(sessions: &[Session], now: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        Ok(Self {
            file_name: export_file_name(now),
            contents: serde_json::to_string_pretty(sessions)?,
        })
    }

    /// Write into `dir` under [`Export::file_name`], returning the full path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("focusseal-sessions-{}.json", now.format("%Y-%m-%d"))
}

/// Parse an imported history. Any shape mismatch rejects the whole payload.
pub fn parse_sessions(json: &str) -> Result<Vec<Session>, serde_json::Error> {
    serde_json::from_str(json)
}
