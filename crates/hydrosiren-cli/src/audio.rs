//! Terminal audio backend.
//!
//! The terminal has no codec, so file-backed tracks always report a
//! playback failure and the arbiter drops to its tone tier, which this
//! backend renders as the terminal bell. A richer frontend would implement
//! the same port against a real audio device.

use std::io::Write;

use hydrosiren_core::{AudioBackend, AudioError, TonePattern, TrackSession};

pub struct BellBackend;

pub struct BellSession;

impl TrackSession for BellSession {
    fn set_level(&mut self, target: f32, ramp_ms: u64) {
        tracing::trace!(level = target, ramp_ms, "level ramp");
    }

    fn stop(&mut self) {
        tracing::trace!("session stopped");
    }
}

impl AudioBackend for BellBackend {
    type Session = BellSession;

    fn unlock(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_track(&mut self, track: &str) -> Result<BellSession, AudioError> {
        Err(AudioError::Playback {
            track: track.into(),
            message: "terminal frontend has no track decoder".into(),
        })
    }

    fn start_tone(&mut self, pattern: TonePattern, duration_ms: u64) -> Result<(), AudioError> {
        tracing::debug!(?pattern, duration_ms, "ringing terminal bell");
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|_| stdout.flush())
            .map_err(|e| AudioError::Tone(e.to_string()))
    }

    fn stop_tones(&mut self) {}
}
