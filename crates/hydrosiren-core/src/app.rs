//! Application driver.
//!
//! [`HydrationApp`] owns every piece of mutable state (timer, siren table,
//! playback arbiter, status text) and is the single entry point the
//! frontend drives: commands (`start`/`stop`/`reset`), the periodic
//! [`tick`](HydrationApp::tick), the foreground-regain resync, and
//! [`snapshot`](HydrationApp::snapshot) for rendering.
//!
//! Everything is cooperative and single-owner: a tick runs to completion,
//! so the arbiter's check-then-set playback flags need no lock.

use chrono::Local;

use crate::audio::arbiter::{Completion, PlaybackArbiter, PlaybackTiming};
use crate::audio::playlist::Playlist;
use crate::audio::AudioBackend;
use crate::clock::Clock;
use crate::config::{BreakKind, Config};
use crate::display::{self, Snapshot};
use crate::error::AudioError;
use crate::events::Event;
use crate::siren::SirenScheduler;
use crate::timer::CycleTimer;

pub struct HydrationApp<C: Clock, B: AudioBackend> {
    clock: C,
    config: Config,
    timer: CycleTimer,
    scheduler: SirenScheduler<Local>,
    arbiter: PlaybackArbiter<B>,
    status: String,
    unlocked: bool,
}

impl<C: Clock, B: AudioBackend> HydrationApp<C, B> {
    pub fn new(config: Config, clock: C, backend: B) -> Self {
        let timer = CycleTimer::new(config.timer.interval_ms(), clock.now_ms());
        let scheduler = SirenScheduler::new(config.sirens.clone());
        let playlist = Playlist::new(config.audio.tracks.clone(), config.audio.shuffle_seed);
        let arbiter = PlaybackArbiter::new(
            backend,
            playlist,
            config.audio.siren_track.clone(),
            PlaybackTiming::from_config(&config),
        );
        let status = idle_status(&config);
        Self {
            clock,
            config,
            timer,
            scheduler,
            arbiter,
            status,
            unlocked: false,
        }
    }

    pub fn timer(&self) -> &CycleTimer {
        &self.timer
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn hydration_playing(&self) -> bool {
        self.arbiter.hydration_playing()
    }

    pub fn siren_playing(&self) -> bool {
        self.arbiter.siren_playing()
    }

    /// Start (or resume) the hydration cycle. The first start performs the
    /// one-time audio unlock; on failure the cycle does not start, the
    /// status instructs a retry, and nothing is retried automatically.
    /// Every successful start re-derives the full siren table.
    pub fn start(&mut self) -> Result<Vec<Event>, AudioError> {
        if !self.unlocked {
            if let Err(err) = self.arbiter.unlock() {
                tracing::warn!(error = %err, "audio unlock failed");
                self.status = "Audio initialization failed. Try Start again.".into();
                return Err(err);
            }
            self.unlocked = true;
        }
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();
        self.scheduler.schedule_all(&now);

        let mut events = Vec::new();
        if let Some(event) = self.timer.start(now_ms) {
            self.status = match event {
                Event::TimerStarted {
                    resumes_after_break: true,
                    ..
                } => "Timer started. Will resume after break.".into(),
                _ => "Timer started. Stay hydrated!".into(),
            };
            events.push(event);
        }
        Ok(events)
    }

    pub fn stop(&mut self) -> Option<Event> {
        let event = self.timer.stop(self.clock.now_ms())?;
        self.status = "Timer paused. Click Start to resume.".into();
        Some(event)
    }

    /// Unconditional return to the initial cycle. In-flight audio stops
    /// immediately, without fade.
    pub fn reset(&mut self) -> Event {
        self.arbiter.stop_all();
        let event = self.timer.reset(self.clock.now_ms());
        self.status = idle_status(&self.config);
        event
    }

    /// The periodic resync tick. Within one tick: siren firings first, then
    /// playback-session completions, then break-end detection, then
    /// deadline-crossing detection, so a break ending and a reminder coming
    /// due in the same tick resolve break-end first.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();
        let mut events = Vec::new();

        for firing in self.scheduler.poll(&now) {
            // A siren arriving while one plays is dropped whole: no audio,
            // no break window.
            if self.arbiter.siren_playing() {
                tracing::debug!(label = %firing.label, "siren dropped, one already playing");
                continue;
            }
            // The break window becomes authoritative before any audio runs.
            let duration = self.config.breaks.duration_ms(firing.kind) as i64;
            events.push(self.timer.begin_break(firing.kind, now_ms + duration, now_ms));
            if let Some(start) = self.arbiter.play_siren(firing.kind, now_ms) {
                self.status = format!(
                    "{} playing for {}s\u{2026}",
                    firing.label, self.config.breaks.siren_play_secs
                );
                events.push(Event::SirenFired {
                    label: firing.label,
                    kind: firing.kind,
                    fallback: start.fallback,
                    at_ms: now_ms,
                });
                if let Some(fallback) = start.preempted_fallback {
                    events.push(Event::HydrationFinished {
                        preempted: true,
                        fallback,
                        at_ms: now_ms,
                    });
                    // On break by construction, so this defers the cycle
                    // advance to the break-end transition.
                    if let Some(event) = self.timer.complete_session(now_ms) {
                        events.push(event);
                    }
                }
            }
        }

        for completion in self.arbiter.tick(now_ms) {
            match completion {
                Completion::Hydration { fallback } => {
                    events.push(Event::HydrationFinished {
                        preempted: false,
                        fallback,
                        at_ms: now_ms,
                    });
                    match self.timer.complete_session(now_ms) {
                        Some(event) => {
                            self.status = format!(
                                "Next hydration in {} minutes.",
                                self.config.timer.interval_min
                            );
                            events.push(event);
                        }
                        None => {
                            self.status =
                                "In break time. Timer will resume after break.".into();
                        }
                    }
                }
                Completion::Siren { kind } => {
                    self.status = match kind {
                        BreakKind::Lunch => format!(
                            "Lunch break started. Timer paused for {} minutes.",
                            self.config.breaks.lunch_min
                        ),
                        BreakKind::Short => format!(
                            "Break started. Timer paused for {} minutes.",
                            self.config.breaks.short_min
                        ),
                    };
                }
            }
        }

        if self.timer.app_started() {
            if let Some(event) = self.timer.end_break_if_elapsed(now_ms) {
                if matches!(event, Event::BreakEnded { resumed: true, .. }) {
                    self.status = "Break ended. Timer resumed.".into();
                }
                events.push(event);
            }

            if self.timer.deadline_crossed(now_ms)
                && !self.arbiter.hydration_playing()
                && !self.arbiter.siren_playing()
            {
                let cycle = self.timer.cycle();
                if let Some(start) = self.arbiter.play_hydration(now_ms) {
                    self.status = format!(
                        "Hydration reminder playing for {}s\u{2026}",
                        self.config.timer.play_secs
                    );
                    events.push(Event::HydrationDue {
                        cycle,
                        track: start.track,
                        at_ms: now_ms,
                    });
                }
            }
        }

        events
    }

    /// One-time resync after the process regains the foreground: a deeply
    /// past deadline is pulled up to now, and the next tick fires exactly
    /// one reminder.
    pub fn on_foreground(&mut self) {
        self.timer.resync(self.clock.now_ms());
    }

    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        let now_ms = now.timestamp_millis();

        let countdown_ms = self
            .timer
            .break_remaining_ms(now_ms)
            .unwrap_or_else(|| self.timer.remaining_ms(now_ms));

        let upcoming = if self.scheduler.is_armed() {
            self.scheduler.upcoming()
        } else {
            self.scheduler.preview(&now)
        };
        let upcoming_items: Vec<(String, chrono::DateTime<Local>)> = upcoming
            .into_iter()
            .map(|(entry, when)| (entry.label.clone(), when))
            .collect();

        let break_info = self.timer.break_kind().and_then(|kind| {
            self.timer
                .break_remaining_ms(now_ms)
                .map(|remaining| display::break_info(kind, remaining))
        });

        Snapshot {
            clock_text: display::format_clock(&now),
            countdown_text: display::mmss_from_ms(countdown_ms),
            status_line: self.status.clone(),
            upcoming_sirens: display::upcoming_line(&upcoming_items),
            break_info,
            cycle_text: format!("Cycle {}", self.timer.cycle()),
            can_start: !self.timer.running(),
            can_stop: self.timer.running(),
            can_reset: self.timer.app_started(),
        }
    }
}

fn idle_status(config: &Config) -> String {
    format!(
        "Press Start to begin the {}-minute hydration cycle.",
        config.timer.interval_min
    )
}
