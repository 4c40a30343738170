//! Audio playback arbiter.
//!
//! Serializes the single audible output between two producers: hydration
//! reminders and sirens. Each session is a two-tier attempt: a file-backed
//! track with fade-in/out envelopes, falling back to a synthesized tone of
//! the same total duration. The fallback is the terminal case and never
//! fails outward.
//!
//! The arbiter has no threads and no internal timers. A session is a small
//! phase machine advanced by [`PlaybackArbiter::tick`]; wall time is the
//! only scheduling primitive, so total elapsed time per session is
//! deterministic: `play_ms`, plus the trailing settle window on the track
//! path.

use crate::audio::playlist::Playlist;
use crate::audio::{AudioBackend, TonePattern, TrackSession};
use crate::config::{BreakKind, Config};
use crate::error::AudioError;

/// Fade and duration windows, fixed at process start.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackTiming {
    pub play_ms: i64,
    pub siren_play_ms: i64,
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub settle_ms: u64,
    pub preempt_fade_ms: u64,
    pub level: f32,
}

impl PlaybackTiming {
    pub fn from_config(config: &Config) -> Self {
        Self {
            play_ms: config.timer.play_ms() as i64,
            siren_play_ms: config.breaks.siren_play_ms() as i64,
            fade_in_ms: config.audio.fade_in_ms,
            fade_out_ms: config.audio.fade_out_ms,
            settle_ms: config.audio.settle_ms,
            preempt_fade_ms: config.audio.preempt_fade_ms,
            level: config.audio.level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackPhase {
    FadeIn,
    Hold,
    FadeOut,
    Settle,
}

enum Media<S> {
    Track { session: S, phase: TrackPhase },
    Tone,
}

struct Active<S> {
    media: Media<S>,
    started_ms: i64,
    duration_ms: i64,
    phase_end_ms: i64,
    fallback: bool,
}

/// Outcome of a granted hydration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationStart {
    pub track: Option<String>,
    pub fallback: bool,
}

/// Outcome of a granted siren request. `preempted_fallback` is `Some` when
/// hydration audio was active and forced toward silence; the value is that
/// session's own fallback flag, for the completion report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SirenStart {
    pub fallback: bool,
    pub preempted_fallback: Option<bool>,
}

/// A session that ran to its scheduled end during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Hydration { fallback: bool },
    Siren { kind: BreakKind },
}

/// Owns the two playback flags and the fallback policy.
///
/// The flags are checked-then-set within one synchronous call, which is
/// sound only under the single-owner cooperative model this crate assumes;
/// a parallel embedding must route all calls through one task.
pub struct PlaybackArbiter<B: AudioBackend> {
    backend: B,
    playlist: Playlist,
    siren_track: String,
    timing: PlaybackTiming,
    hydration: Option<Active<B::Session>>,
    siren: Option<(Active<B::Session>, BreakKind)>,
    /// Preempted hydration session riding out its fast fade; dropped at the
    /// recorded instant.
    preempted: Option<(B::Session, i64)>,
}

impl<B: AudioBackend> PlaybackArbiter<B> {
    pub fn new(backend: B, playlist: Playlist, siren_track: String, timing: PlaybackTiming) -> Self {
        Self {
            backend,
            playlist,
            siren_track,
            timing,
            hydration: None,
            siren: None,
            preempted: None,
        }
    }

    pub fn hydration_playing(&self) -> bool {
        self.hydration.is_some()
    }

    pub fn siren_playing(&self) -> bool {
        self.siren.is_some()
    }

    /// One-time audio unlock, forwarded to the backend. The only audio
    /// error callers ever see.
    pub fn unlock(&mut self) -> Result<(), AudioError> {
        self.backend.unlock()
    }

    /// Begin a hydration reminder session. Dropped (None) while either
    /// producer is active.
    pub fn play_hydration(&mut self, now_ms: i64) -> Option<HydrationStart> {
        if self.hydration.is_some() || self.siren.is_some() {
            return None;
        }
        let play_ms = self.timing.play_ms;
        let (active, track) = match self.playlist.next_track() {
            Some(track) => match self.start_track(&track, play_ms, now_ms) {
                Ok(active) => (active, Some(track)),
                Err(err) => {
                    tracing::warn!(%track, error = %err, "hydration track failed, using synth fallback");
                    (
                        self.start_tone(TonePattern::HydrationPulse, play_ms, now_ms),
                        None,
                    )
                }
            },
            None => (
                self.start_tone(TonePattern::HydrationPulse, play_ms, now_ms),
                None,
            ),
        };
        let fallback = active.fallback;
        self.hydration = Some(active);
        Some(HydrationStart { track, fallback })
    }

    /// Begin a siren session. A siren firing while one plays is dropped,
    /// not queued. Active hydration audio is forced toward silence with the
    /// fast preemption fade and reported finished immediately.
    pub fn play_siren(&mut self, kind: BreakKind, now_ms: i64) -> Option<SirenStart> {
        if self.siren.is_some() {
            return None;
        }
        let preempted_fallback = self.preempt_hydration(now_ms);
        let siren_play_ms = self.timing.siren_play_ms;
        let track = self.siren_track.clone();
        let active = match self.start_track(&track, siren_play_ms, now_ms) {
            Ok(active) => active,
            Err(err) => {
                tracing::warn!(%track, error = %err, "siren track failed, using synth fallback");
                self.start_tone(pattern_for(kind), siren_play_ms, now_ms)
            }
        };
        let fallback = active.fallback;
        self.siren = Some((active, kind));
        Some(SirenStart {
            fallback,
            preempted_fallback,
        })
    }

    /// Advance fades and finish sessions whose scheduled end has passed.
    pub fn tick(&mut self, now_ms: i64) -> Vec<Completion> {
        if let Some((_, drop_at)) = &self.preempted {
            if now_ms >= *drop_at {
                if let Some((mut session, _)) = self.preempted.take() {
                    session.stop();
                }
            }
        }

        let timing = self.timing;
        let mut completions = Vec::new();
        let hydration_done = self
            .hydration
            .as_mut()
            .is_some_and(|active| advance(active, now_ms, &timing));
        if hydration_done {
            if let Some(active) = self.hydration.take() {
                completions.push(Completion::Hydration {
                    fallback: active.fallback,
                });
            }
        }
        let siren_done = self
            .siren
            .as_mut()
            .is_some_and(|(active, _)| advance(active, now_ms, &timing));
        if siren_done {
            if let Some((_, kind)) = self.siren.take() {
                completions.push(Completion::Siren { kind });
            }
        }
        completions
    }

    /// The reset path: stop everything immediately, no fade.
    pub fn stop_all(&mut self) {
        if let Some(active) = self.hydration.take() {
            stop_media(active.media);
        }
        if let Some((active, _)) = self.siren.take() {
            stop_media(active.media);
        }
        if let Some((mut session, _)) = self.preempted.take() {
            session.stop();
        }
        self.backend.stop_tones();
    }

    fn preempt_hydration(&mut self, now_ms: i64) -> Option<bool> {
        let active = self.hydration.take()?;
        tracing::info!("siren preempting hydration audio");
        match active.media {
            Media::Track { mut session, .. } => {
                session.set_level(0.0, self.timing.preempt_fade_ms);
                self.preempted = Some((session, now_ms + self.timing.preempt_fade_ms as i64));
            }
            Media::Tone => self.backend.stop_tones(),
        }
        Some(active.fallback)
    }

    fn start_track(
        &mut self,
        track: &str,
        duration_ms: i64,
        now_ms: i64,
    ) -> Result<Active<B::Session>, AudioError> {
        let mut session = self.backend.play_track(track)?;
        session.set_level(self.timing.level, self.timing.fade_in_ms);
        Ok(Active {
            media: Media::Track {
                session,
                phase: TrackPhase::FadeIn,
            },
            started_ms: now_ms,
            duration_ms,
            phase_end_ms: now_ms + self.timing.fade_in_ms as i64,
            fallback: false,
        })
    }

    /// The terminal tier: a refused tone is logged and the session still
    /// runs out its window silently.
    fn start_tone(&mut self, pattern: TonePattern, duration_ms: i64, now_ms: i64) -> Active<B::Session> {
        if let Err(err) = self.backend.start_tone(pattern, duration_ms as u64) {
            tracing::warn!(?pattern, error = %err, "tone synthesis unavailable");
        }
        Active {
            media: Media::Tone,
            started_ms: now_ms,
            duration_ms,
            phase_end_ms: now_ms + duration_ms,
            fallback: true,
        }
    }
}

fn pattern_for(kind: BreakKind) -> TonePattern {
    match kind {
        BreakKind::Short => TonePattern::BreakWarble,
        BreakKind::Lunch => TonePattern::LunchSweep,
    }
}

fn stop_media<S: TrackSession>(media: Media<S>) {
    if let Media::Track { mut session, .. } = media {
        session.stop();
    }
}

/// Step a session's phase machine up to `now_ms`. Returns true once the
/// session is finished and released.
fn advance<S: TrackSession>(active: &mut Active<S>, now_ms: i64, timing: &PlaybackTiming) -> bool {
    loop {
        if now_ms < active.phase_end_ms {
            return false;
        }
        match &mut active.media {
            Media::Tone => return true,
            Media::Track { session, phase } => match phase {
                TrackPhase::FadeIn => {
                    *phase = TrackPhase::Hold;
                    let hold_end = active.started_ms + active.duration_ms - timing.fade_out_ms as i64;
                    active.phase_end_ms = hold_end.max(active.phase_end_ms);
                }
                TrackPhase::Hold => {
                    session.set_level(0.0, timing.fade_out_ms);
                    *phase = TrackPhase::FadeOut;
                    active.phase_end_ms = active.started_ms + active.duration_ms;
                }
                TrackPhase::FadeOut => {
                    *phase = TrackPhase::Settle;
                    active.phase_end_ms += timing.settle_ms as i64;
                }
                TrackPhase::Settle => {
                    session.stop();
                    return true;
                }
            },
        }
    }
}
