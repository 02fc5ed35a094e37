use clap::Subcommand;
use energy_station_core::{FileSettingsStore, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting
    Get {
        /// Setting key (e.g. "notifications.todo_reminder", "practice.breathing_minutes")
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileSettingsStore::open_default()?;
    match action {
        ConfigAction::Get { key } => match store.get(&key)? {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            store.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = store.load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            store.reset()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
