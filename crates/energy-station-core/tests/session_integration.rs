//! End-to-end session flows over the built-in catalog.

use std::sync::{Arc, Mutex};

use energy_station_core::{
    Catalog, Clock, ContentKind, Event, ManualClock, SessionController, SessionStatus,
};

fn session_for(id: &str) -> SessionController<ManualClock> {
    let catalog = Catalog::builtin();
    let item = catalog.lookup(id).unwrap();
    SessionController::for_content(item, ManualClock::new()).unwrap()
}

fn names(events: &[Event]) -> Vec<&'static str> {
    events.iter().map(Event::name).collect()
}

#[test]
fn test_breathing_478_full_session() {
    let mut session = session_for("breathing_001");
    session.set_practice_minutes(5).unwrap();
    assert_eq!(session.total_secs(), Some(300));

    let started = session.start();
    assert_eq!(names(&started), ["SessionStarted", "PhaseChanged"]);

    // One full 4-7-8 cycle puts the sequencer back on the inhale.
    let events = session.advance_clock(19);
    let phases: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseChanged { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(phases, [1, 2, 0]);
    assert_eq!(session.phase_index(), Some(0));
    assert_eq!(session.remaining_secs(), Some(281.0));

    let rest = session.advance_clock(1_000);
    assert_eq!(rest.iter().filter(|e| e.is_completion()).count(), 1);
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.elapsed_secs(), 300.0);
    assert!(!session.clock().is_running());
}

#[test]
fn test_meditation_pause_resume_and_complete() {
    let mut session = session_for("meditation_002");
    assert_eq!(session.kind(), ContentKind::Meditation);
    assert_eq!(session.total_secs(), Some(600));

    session.start();
    session.advance_clock(120);
    assert_eq!(names(&session.pause()), ["SessionPaused"]);

    // Paused: the manual clock is stopped, nothing advances.
    assert!(session.advance_clock(50).is_empty());
    assert_eq!(session.elapsed_secs(), 120.0);

    assert_eq!(names(&session.start()), ["SessionResumed"]);
    session.set_speed(2.0).unwrap();
    let events = session.advance_clock(240);
    assert!(events.last().unwrap().is_completion());
    assert_eq!(session.remaining_secs(), Some(0.0));
}

#[test]
fn test_mindfulness_seek_then_restart_is_new_activation() {
    let mut session = session_for("mindfulness_001");
    let activations = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&activations);
    session.on_complete(move |done| sink.lock().unwrap().push(done.activation));

    session.start();
    session.seek(749.0).unwrap();
    session.advance_clock(5);
    assert_eq!(session.status(), SessionStatus::Completed);
    assert!(session.seek(10.0).is_none());

    session.start();
    assert_eq!(session.activation(), 2);
    assert_eq!(session.elapsed_secs(), 0.0);
    session.skip(1_000.0).unwrap();
    session.advance_clock(1);

    assert_eq!(*activations.lock().unwrap(), [1, 2]);
}

#[test]
fn test_white_noise_timer_and_track_switch() {
    let catalog = Catalog::builtin();
    let mut session = session_for("rain");
    assert_eq!(session.total_secs(), None);

    session.set_timer_minutes(15).unwrap();
    session.start();
    session.advance_clock(600);
    assert_eq!(session.remaining_secs(), Some(300.0));

    let ocean = catalog.get("ocean").unwrap();
    let events = session.select_noise(ocean).unwrap();
    assert_eq!(names(&events), ["SessionReset", "ContentChanged"]);
    assert_eq!(session.content_id(), "ocean");
    assert_eq!(session.status(), SessionStatus::Idle);

    // Same track again toggles playback.
    session.select_noise(ocean).unwrap();
    assert_eq!(session.status(), SessionStatus::Running);
    session.select_noise(ocean).unwrap();
    assert_eq!(session.status(), SessionStatus::Paused);
}

#[test]
fn test_events_serialize_with_type_tag() {
    let mut session = session_for("breathing_002");
    let events = session.start();
    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "SessionStarted");
    assert_eq!(json["content_id"], "breathing_002");

    let snapshot = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["status"], "running");
    assert_eq!(snapshot["kind"], "breathing");
    assert_eq!(snapshot["phase"]["index"], 0);

    let parsed: Event = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, events[0]);
}
