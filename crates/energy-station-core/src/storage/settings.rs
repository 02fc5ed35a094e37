//! Key-value settings store.
//!
//! Holds the user's flags and practice defaults:
//! - Notification toggles
//! - Default breathing length, background music, white-noise volume
//! - Default playback speed
//!
//! Keys are dot paths into [`Settings`] (`notifications.todo_reminder`).
//! The file-backed store keeps a TOML file in the data directory. Session
//! state is never stored here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::session::{validate_breathing_minutes, validate_speed, DEFAULT_BREATHING_MINUTES};

const SETTINGS_FILE: &str = "settings.toml";

/// Notification toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub energy_reminder: bool,
    #[serde(default = "default_true")]
    pub community_interaction: bool,
    #[serde(default = "default_true")]
    pub system_message: bool,
    #[serde(default)]
    pub mood_record_reminder: bool,
    #[serde(default = "default_true")]
    pub todo_reminder: bool,
    #[serde(default = "default_true")]
    pub personalized_recommendation: bool,
}

/// Defaults applied when a practice screen opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSettings {
    #[serde(default = "default_breathing_minutes")]
    pub breathing_minutes: u32,
    #[serde(default = "default_true")]
    pub background_music: bool,
    #[serde(default = "default_volume")]
    pub white_noise_volume: u32,
    #[serde(default = "default_speed")]
    pub playback_speed: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub practice: PracticeSettings,
}

fn default_true() -> bool {
    true
}
fn default_breathing_minutes() -> u32 {
    DEFAULT_BREATHING_MINUTES
}
fn default_volume() -> u32 {
    70
}
fn default_speed() -> f64 {
    1.0
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            energy_reminder: true,
            community_interaction: true,
            system_message: true,
            mood_record_reminder: false,
            todo_reminder: true,
            personalized_recommendation: true,
        }
    }
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            breathing_minutes: default_breathing_minutes(),
            background_music: true,
            white_noise_volume: default_volume(),
            playback_speed: default_speed(),
        }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|_| invalid(format!("expected true or false, got '{value}'")))?,
                serde_json::Value::Number(n) if n.is_u64() => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("expected a whole number, got '{value}'")))?,
                serde_json::Value::Number(_) => value
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot assign a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Get a value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, parsed according to the current
    /// value's type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse or
    /// is out of range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the first out-of-range practice value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let practice = &self.practice;
        validate_breathing_minutes(practice.breathing_minutes).map_err(|e| {
            ConfigError::InvalidValue {
                key: "practice.breathing_minutes".into(),
                message: e.to_string(),
            }
        })?;
        validate_speed(practice.playback_speed).map_err(|e| ConfigError::InvalidValue {
            key: "practice.playback_speed".into(),
            message: e.to_string(),
        })?;
        if practice.white_noise_volume > 100 {
            return Err(ConfigError::InvalidValue {
                key: "practice.white_noise_volume".into(),
                message: format!("expected 0..=100, got {}", practice.white_noise_volume),
            });
        }
        Ok(())
    }

    /// Every key with its current value, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }
}

/// Injected settings service.
pub trait SettingsStore {
    /// # Errors
    ///
    /// Returns an error if stored settings exist but cannot be read.
    fn load(&self) -> Result<Settings>;

    /// # Errors
    ///
    /// Returns an error if the settings cannot be written.
    fn save(&self, settings: &Settings) -> Result<()>;

    /// Value for `key`, or `None` if no such setting exists.
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.set(key, value)?;
        self.save(&settings)
    }

    fn reset(&self) -> Result<()> {
        self.save(&Settings::default())
    }

    /// Load, falling back to defaults on any error.
    fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_else(|e| {
            warn!("failed to load settings, using defaults: {e}");
            Settings::default()
        })
    }
}

/// In-process store, for tests and for hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings.clone();
        Ok(())
    }
}

/// TOML file store.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Store at `settings.toml` in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(data_dir()?.join(SETTINGS_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    /// A missing file yields defaults.
    fn load(&self) -> Result<Settings> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let settings: Settings = toml::from_str(&content).map_err(ConfigError::from)?;
        settings.validate()?;
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content = toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
