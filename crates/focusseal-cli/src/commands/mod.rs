pub mod config;
pub mod history;
pub mod settings;
pub mod timer;

use focusseal_core::{Config, SessionTimer, SqliteStore, SystemClock};

/// Open the timer over the configured SQLite store.
pub fn open_timer(config: &Config) -> Result<SessionTimer, Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&config.storage.database)?;
    Ok(SessionTimer::load(
        store,
        SystemClock,
        timer::TerminalFeedback,
    ))
}
