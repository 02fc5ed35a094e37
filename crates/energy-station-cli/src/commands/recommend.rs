use energy_station_core::{recommend, Assessment};
use serde::Serialize;

use super::print_json;

#[derive(clap::Args, Debug)]
pub struct RecommendArgs {
    /// Energy level, 1 (drained) to 5 (full)
    #[arg(long)]
    pub energy: u8,
    /// Stress level, 1 (calm) to 5 (overwhelmed)
    #[arg(long)]
    pub stress: u8,
    /// Mood, 1 (low) to 5 (great)
    #[arg(long)]
    pub mood: u8,
}

#[derive(Serialize)]
struct Row<'a> {
    #[serde(flatten)]
    recommendation: &'a energy_station_core::Recommendation,
    route: String,
}

pub fn run(args: RecommendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let assessment = Assessment::new(args.energy, args.stress, args.mood);
    let picks = recommend(&assessment)?;
    let rows: Vec<Row<'_>> = picks
        .iter()
        .map(|r| Row {
            recommendation: r,
            route: r.route(),
        })
        .collect();
    print_json(&rows)
}
