//! # Energy Station Core Library
//!
//! Core logic for the Energy Station practice player: guided meditation,
//! breathing exercises, mindfulness audio and white noise. Everything is
//! usable from the standalone `energy-station` CLI; a UI shell only renders
//! snapshots and forwards user commands.
//!
//! ## Architecture
//!
//! - **Session engine**: a play/pause/reset state machine driven by ticks from
//!   an injected [`Clock`]. The engine never spawns threads of its own.
//! - **Content**: the built-in catalog and per-kind detail routes
//! - **Recommendations**: rule-based picks from an energy self-assessment
//! - **Storage**: TOML-backed settings behind the [`SettingsStore`] trait
//!
//! ## Key Components
//!
//! - [`SessionController`]: session lifecycle and tick handling
//! - [`PhaseSequencer`]: cyclic breathing phases
//! - [`ProgressTracker`]: elapsed vs. total for playback
//! - [`Catalog`]: practice content lookup

pub mod clock;
pub mod content;
pub mod error;
pub mod events;
pub mod recommend;
pub mod session;
pub mod storage;

pub use clock::{Clock, IntervalClock, ManualClock, Tick, TICK_PERIOD};
pub use content::{Catalog, ContentItem, ContentKind};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use recommend::{recommend, Assessment, Need, Recommendation};
pub use session::{
    format_clock, Completion, Phase, PhaseSequencer, ProgressTracker, SessionController,
    SessionPlan, SessionStatus, SessionView, TimerSelection, Visual,
};
pub use storage::{data_dir, FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};
