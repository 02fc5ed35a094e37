pub mod catalog;
pub mod config;
pub mod play;
pub mod recommend;
pub mod simulate;

use energy_station_core::{
    Catalog, ContentItem, ContentKind, FileSettingsStore, SessionPlan, SettingsStore,
};

/// Session options shared by `simulate` and `play`.
#[derive(clap::Args, Debug, Clone)]
pub struct SessionOptions {
    /// Content id (e.g. "breathing_001", "rain")
    pub id: String,
    /// Breathing practice length in minutes (5, 10 or 15)
    #[arg(long)]
    pub minutes: Option<u32>,
    /// Meditation playback speed
    #[arg(long)]
    pub speed: Option<f64>,
    /// White-noise auto-stop timer in minutes (0, 15, 30 or 60)
    #[arg(long)]
    pub timer: Option<u32>,
}

impl SessionOptions {
    /// Catalog item plus the plan to run it with. Missing options fall back
    /// to the saved practice settings.
    pub fn resolve<'a>(
        &self,
        catalog: &'a Catalog,
    ) -> Result<(&'a ContentItem, SessionPlan), Box<dyn std::error::Error>> {
        let item = catalog.lookup(&self.id)?;
        let practice = FileSettingsStore::open_default()?.load_or_default().practice;

        let plan = match SessionPlan::for_content(item) {
            plan @ SessionPlan::Breathing { .. } => {
                plan.with_breathing_minutes(self.minutes.unwrap_or(practice.breathing_minutes))?
            }
            plan @ SessionPlan::Playback { .. } if item.kind() == ContentKind::Meditation => {
                plan.with_speed(self.speed.unwrap_or(practice.playback_speed))?
            }
            plan @ SessionPlan::Playback { .. } => match self.speed {
                Some(speed) => plan.with_speed(speed)?,
                None => plan,
            },
            plan => plan,
        };
        Ok((item, plan))
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
