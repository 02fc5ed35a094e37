//! Property tests for the session engine invariants.

use std::sync::{Arc, Mutex};

use energy_station_core::session::SPEED_PRESETS;
use energy_station_core::{
    ContentKind, ManualClock, Phase, PhaseSequencer, ProgressTracker, SessionController,
    SessionPlan, SessionStatus,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Toggle,
    Reset,
    Ticks(u32),
    Seek(f64),
    Skip(f64),
    Speed(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Pause),
        Just(Op::Toggle),
        Just(Op::Reset),
        (0u32..400).prop_map(Op::Ticks),
        (-100.0f64..1_000.0).prop_map(Op::Seek),
        (-60.0f64..60.0).prop_map(Op::Skip),
        (0..SPEED_PRESETS.len()).prop_map(Op::Speed),
    ]
}

fn apply(session: &mut SessionController<ManualClock>, op: &Op) {
    match op {
        Op::Start => {
            session.start();
        }
        Op::Pause => {
            session.pause();
        }
        Op::Toggle => {
            session.toggle_play_pause();
        }
        Op::Reset => {
            session.reset();
        }
        Op::Ticks(n) => {
            session.advance_clock(*n);
        }
        Op::Seek(pos) => {
            session.seek(*pos);
        }
        Op::Skip(delta) => {
            session.skip(*delta);
        }
        Op::Speed(i) => {
            let _ = session.set_speed(SPEED_PRESETS[*i]);
        }
    }
}

fn phases_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..12, 1..6)
}

proptest! {
    #[test]
    fn sequencer_position_is_ticks_mod_cycle(durations in phases_strategy(), ticks in 0u64..500) {
        let phases: Vec<Phase> = durations
            .iter()
            .enumerate()
            .map(|(i, d)| Phase::new(format!("phase {i}"), *d, ""))
            .collect();
        let mut sequencer = PhaseSequencer::new(phases).unwrap();
        sequencer.start();
        for _ in 0..ticks {
            sequencer.tick();
        }

        let cycle = sequencer.cycle_secs();
        let offset = ticks % cycle;
        let mut boundary = 0u64;
        let mut expected = 0usize;
        for (i, d) in durations.iter().enumerate() {
            boundary += u64::from(*d);
            if offset < boundary {
                expected = i;
                break;
            }
        }

        prop_assert_eq!(sequencer.index(), expected);
        prop_assert_eq!(u64::from(sequencer.phase_remaining_secs()), boundary - offset);
        prop_assert_eq!(sequencer.cycles_completed(), ticks / cycle);
    }

    #[test]
    fn seek_always_lands_inside_bounds(total in 1u64..10_000, position in proptest::num::f64::ANY) {
        let mut tracker = ProgressTracker::new(total).unwrap();
        tracker.seek_to(position);
        prop_assert!(tracker.elapsed_secs() >= 0.0);
        prop_assert!(tracker.elapsed_secs() <= total as f64);
    }

    #[test]
    fn zero_advance_after_seek_keeps_position(
        total in 1u64..10_000,
        fraction in 0.0f64..=1.0,
        at_end in any::<bool>(),
    ) {
        let mut tracker = ProgressTracker::new(total).unwrap();
        let target = if at_end { total as f64 } else { total as f64 * fraction };
        let landed = tracker.seek_to(target);

        let first = tracker.advance(0.0);
        prop_assert_eq!(tracker.elapsed_secs(), landed);
        prop_assert_eq!(first, landed >= total as f64);

        let second = tracker.advance(0.0);
        prop_assert_eq!(tracker.elapsed_secs(), landed);
        prop_assert!(!second);
        prop_assert_eq!(tracker.is_complete(), first);
    }

    #[test]
    fn elapsed_is_monotonic_while_ticking(
        total in 1u64..600,
        speed in prop::sample::select(SPEED_PRESETS.to_vec()),
        ticks in 1u32..1_500,
    ) {
        let mut session = SessionController::new(
            "meditation_001",
            ContentKind::Meditation,
            SessionPlan::playback(total).with_speed(speed).unwrap(),
            ManualClock::new(),
        )
        .unwrap();
        session.start();

        let mut last = session.elapsed_secs();
        for _ in 0..ticks {
            session.advance_clock(1);
            let now = session.elapsed_secs();
            prop_assert!(now >= last);
            prop_assert!(now <= total as f64);
            last = now;
        }
    }

    #[test]
    fn completion_fires_at_most_once_per_activation(
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut session = SessionController::new(
            "mindfulness_001",
            ContentKind::Mindfulness,
            SessionPlan::playback(300),
            ManualClock::new(),
        )
        .unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.on_complete(move |done| sink.lock().unwrap().push(done.activation));

        for op in &ops {
            apply(&mut session, op);
        }

        let seen = seen.lock().unwrap();
        let mut unique = seen.clone();
        unique.dedup();
        prop_assert_eq!(unique.len(), seen.len());
        prop_assert!(seen.iter().all(|a| *a <= session.activation()));
        if session.status() == SessionStatus::Completed {
            prop_assert_eq!(seen.last().copied(), Some(session.activation()));
        }
    }

    #[test]
    fn reset_restores_initial_state_from_anywhere(
        durations in phases_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..30),
    ) {
        let phases: Vec<Phase> = durations
            .iter()
            .map(|d| Phase::new("吸气", *d, ""))
            .collect();
        let mut session = SessionController::new(
            "breathing_001",
            ContentKind::Breathing,
            SessionPlan::breathing(phases, 300),
            ManualClock::new(),
        )
        .unwrap();
        for op in &ops {
            apply(&mut session, op);
        }

        session.reset();
        prop_assert_eq!(session.status(), SessionStatus::Idle);
        prop_assert_eq!(session.elapsed_secs(), 0.0);
        prop_assert_eq!(session.phase_index(), Some(0));
        prop_assert!(session.clock().fire().is_none());
        prop_assert!(session.advance_clock(10).is_empty());
    }
}
