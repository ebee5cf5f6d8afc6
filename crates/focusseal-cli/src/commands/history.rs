use std::path::PathBuf;

use clap::Subcommand;
use focusseal_core::Config;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recorded sessions, newest first
    List {
        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },
    /// Totals for all time and for today
    Stats,
    /// Write the history to a dated JSON file
    Export {
        /// Target directory (defaults to export.directory, then the working directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Prepend sessions from a JSON file
    Import {
        file: PathBuf,
    },
    /// Delete all recorded sessions
    Clear,
}

pub fn run(action: HistoryAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = super::open_timer(config)?;

    match action {
        HistoryAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(timer.sessions())?);
                return Ok(());
            }
            if timer.sessions().is_empty() {
                println!("no sessions recorded");
            }
            for s in timer.sessions() {
                println!(
                    "{}  {:<8} {:>3} min  {}",
                    s.start_time.format("%Y-%m-%d %H:%M"),
                    s.preset,
                    s.duration_minutes,
                    if s.completed { "completed" } else { "sealed" },
                );
            }
        }
        HistoryAction::Stats => {
            println!("{}", serde_json::to_string_pretty(&timer.stats())?);
        }
        HistoryAction::Export { dir } => {
            let dir = dir
                .or_else(|| config.export_dir())
                .unwrap_or_else(|| PathBuf::from("."));
            let path = timer.export_sessions()?.write_to(&dir)?;
            println!("{}", path.display());
        }
        HistoryAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let before = timer.sessions().len();
            if !timer.import_sessions(&content) {
                return Err(format!("{} is not a valid session list", file.display()).into());
            }
            println!("imported {} sessions", timer.sessions().len() - before);
        }
        HistoryAction::Clear => {
            timer.clear_history()?;
            println!("history cleared");
        }
    }
    Ok(())
}
