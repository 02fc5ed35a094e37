use energy_station_core::session::SKIP_STEP_SECS;
use energy_station_core::{Catalog, ManualClock, SessionController};

use super::{print_json, SessionOptions};

#[derive(clap::Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionOptions,
    /// Number of one-second ticks to fire
    #[arg(long)]
    pub ticks: u32,
    /// Seek to this position (seconds) right after starting
    #[arg(long)]
    pub seek: Option<f64>,
    /// Press the skip button this many times after seeking; negative skips back
    #[arg(long, allow_hyphen_values = true)]
    pub skip: Option<i32>,
}

/// Runs on a manual clock, so output depends only on the arguments.
pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();
    let (item, plan) = args.session.resolve(&catalog)?;
    let mut session = SessionController::new(item.id(), item.kind(), plan, ManualClock::new())?;

    let mut events = Vec::new();
    if let Some(minutes) = args.session.timer {
        events.push(session.set_timer_minutes(minutes)?);
    }
    events.extend(session.start());
    if let Some(position) = args.seek {
        events.extend(session.seek(position));
    }
    if let Some(presses) = args.skip {
        let step = SKIP_STEP_SECS.copysign(f64::from(presses));
        for _ in 0..presses.unsigned_abs() {
            events.extend(session.skip(step));
        }
    }
    events.extend(session.advance_clock(args.ticks));

    for event in &events {
        print_json(event)?;
    }
    print_json(&session.snapshot())
}
