//! # Hydrosiren Core Library
//!
//! Core logic for Hydrosiren, a foreground hydration reminder with a fixed
//! daily schedule of siren breaks. The CLI binary is a thin frontend over
//! this library; a GUI could sit on the same surface.
//!
//! ## Architecture
//!
//! - **Cycle Timer**: a wall-clock-based state machine; the caller feeds
//!   `now` into every operation and drives deadline detection from a
//!   periodic tick
//! - **Siren Scheduler**: a recurring-event table over a pure
//!   `next_occurrence` function, re-armed one calendar day at a time
//! - **Playback Arbiter**: mutual exclusion between reminder and siren
//!   audio, with fade envelopes and a synthesized-tone fallback tier
//! - **Display**: pure snapshot formatting for whatever frontend renders it
//!
//! ## Key Components
//!
//! - [`HydrationApp`]: the owned state struct tying everything together
//! - [`CycleTimer`]: hydration countdown, pause/resume, cycle counter
//! - [`SirenScheduler`]: daily occurrences with cancel-all/reschedule-all
//! - [`AudioBackend`]: the port a frontend implements for actual sound

pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod siren;
pub mod timer;

pub use app::HydrationApp;
pub use audio::arbiter::{PlaybackArbiter, PlaybackTiming};
pub use audio::playlist::Playlist;
pub use audio::{AudioBackend, TonePattern, TrackSession};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BreakKind, Config, SirenEntry};
pub use display::Snapshot;
pub use error::{AudioError, ConfigError, CoreError};
pub use events::Event;
pub use siren::{next_occurrence, SirenScheduler};
pub use timer::{CycleTimer, TimerPhase};
