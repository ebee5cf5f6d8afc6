use clap::Subcommand;
use focusseal_core::{Config, SettingsPatch};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Set one setting
    Set {
        /// Setting key (e.g. "quickDuration", "autoStartBreak")
        key: String,
        /// New value
        value: String,
    },
    /// Merge a partial JSON object into the settings
    Patch {
        /// e.g. '{"quickDuration": 12, "soundEnabled": false}'
        json: String,
    },
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = super::open_timer(config)?;

    let patch = match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(timer.settings())?);
            return Ok(());
        }
        SettingsAction::Set { key, value } => SettingsPatch::from_pair(&key, &value)?,
        SettingsAction::Patch { json } => serde_json::from_str::<SettingsPatch>(&json)?,
    };

    if patch.is_empty() {
        return Err("nothing to update".into());
    }
    timer.update_settings(&patch)?;
    println!("{}", serde_json::to_string_pretty(timer.settings())?);
    Ok(())
}
