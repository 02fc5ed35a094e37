mod settings;

pub use settings::{
    FileSettingsStore, MemorySettingsStore, NotificationSettings, PracticeSettings, Settings,
    SettingsStore,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `ENERGY_STATION_DATA_DIR` wins when set. Otherwise
/// `~/.config/energy-station[-dev]/`, where `-dev` is chosen by
/// `ENERGY_STATION_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ENERGY_STATION_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("ENERGY_STATION_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("energy-station-dev")
            } else {
                base_dir.join("energy-station")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
