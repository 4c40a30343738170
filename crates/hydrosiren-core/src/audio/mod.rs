//! Audio backend port and playback arbitration.
//!
//! The crate never touches an audio device. [`AudioBackend`] is the port an
//! embedding frontend implements: file-backed track sessions with level
//! ramps, plus a synthesized tone generator used as the fallback tier. The
//! [`arbiter::PlaybackArbiter`] owns the mutual-exclusion policy between
//! the two producers (hydration reminders and sirens) and drives fade
//! envelopes from the tick loop.

pub mod arbiter;
pub mod playlist;

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Synthesized tone contract. The waveform parameters (oscillator type,
/// warble rate, sweep shape) belong to the backend; the arbiter only picks
/// the pattern and the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TonePattern {
    /// Short alternating-pitch pulses, the hydration fallback.
    HydrationPulse,
    /// Two-tone warble, the short-break siren fallback.
    BreakWarble,
    /// Rising/falling sweep, the lunch siren fallback.
    LunchSweep,
}

/// A live file-backed playback session.
pub trait TrackSession {
    /// Ramp the output level linearly to `target` over `ramp_ms`. Replaces
    /// any ramp still in flight.
    fn set_level(&mut self, target: f32, ramp_ms: u64);

    /// Stop immediately and release the resource.
    fn stop(&mut self);
}

/// The audio output port.
///
/// `play_track` reports failure distinctly from completion; completion
/// itself is time-based and owned by the arbiter. `start_tone` is
/// fire-and-forget for a known duration.
pub trait AudioBackend {
    type Session: TrackSession;

    /// One-time gesture-equivalent unlock before first playback.
    fn unlock(&mut self) -> Result<(), AudioError>;

    fn play_track(&mut self, track: &str) -> Result<Self::Session, AudioError>;

    fn start_tone(&mut self, pattern: TonePattern, duration_ms: u64) -> Result<(), AudioError>;

    /// Silence any in-flight tones (reset and preemption paths).
    fn stop_tones(&mut self);
}
