use std::time::Duration;

use energy_station_core::{Catalog, IntervalClock, SessionController, SessionStatus};
use tracing::debug;

use super::{print_json, SessionOptions};

#[derive(clap::Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub session: SessionOptions,
    /// Tick period in milliseconds; each tick counts as one second of practice
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,
    /// Stop after this many ticks even if the session has not completed
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Time for the tick interval, IO for the Ctrl-C signal driver.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(play(args))
}

async fn play(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();
    let (item, plan) = args.session.resolve(&catalog)?;
    let (clock, mut ticks) = IntervalClock::new(Duration::from_millis(args.tick_ms))?;
    let mut session = SessionController::new(item.id(), item.kind(), plan, clock)?;

    if let Some(minutes) = args.session.timer {
        print_json(&session.set_timer_minutes(minutes)?)?;
    }
    for event in session.start() {
        print_json(&event)?;
    }

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    let mut seen = 0u64;
    loop {
        tokio::select! {
            tick = ticks.recv() => {
                let Some(tick) = tick else { break };
                for event in session.on_tick(tick) {
                    print_json(&event)?;
                }
                seen += 1;
            }
            _ = &mut interrupted => {
                debug!("interrupted");
                for event in session.pause() {
                    print_json(&event)?;
                }
                break;
            }
        }
        if session.status() == SessionStatus::Completed {
            break;
        }
        if args.max_ticks.is_some_and(|max| seen >= max) {
            for event in session.pause() {
                print_json(&event)?;
            }
            break;
        }
    }

    print_json(&session.snapshot())?;
    session.teardown();
    Ok(())
}
