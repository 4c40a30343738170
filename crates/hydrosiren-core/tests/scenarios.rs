//! End-to-end scenarios driving the whole app through a manual clock and a
//! scripted audio backend: reminder firing and cycle advance, siren
//! preemption mid-playback, break end, foreground resync, and the
//! mutual-exclusion invariant over a full simulated day.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local, TimeZone};
use proptest::prelude::*;

use hydrosiren_core::{
    next_occurrence, AudioBackend, AudioError, BreakKind, Clock, Config, CycleTimer, Event,
    HydrationApp, ManualClock, SirenEntry, TonePattern, TrackSession,
};

type CallLog = Rc<RefCell<Vec<String>>>;

struct MockSession {
    name: String,
    log: CallLog,
}

impl TrackSession for MockSession {
    fn set_level(&mut self, target: f32, ramp_ms: u64) {
        self.log
            .borrow_mut()
            .push(format!("{}: level {target} over {ramp_ms}", self.name));
    }

    fn stop(&mut self) {
        self.log.borrow_mut().push(format!("{}: stop", self.name));
    }
}

#[derive(Default)]
struct MockBackend {
    fail_unlock: bool,
    fail_tracks: bool,
    log: CallLog,
}

impl MockBackend {
    fn new() -> (Self, CallLog) {
        let log: CallLog = Rc::default();
        (
            Self {
                fail_unlock: false,
                fail_tracks: false,
                log: log.clone(),
            },
            log,
        )
    }
}

impl AudioBackend for MockBackend {
    type Session = MockSession;

    fn unlock(&mut self) -> Result<(), AudioError> {
        if self.fail_unlock {
            return Err(AudioError::UnlockFailed("output suspended".into()));
        }
        Ok(())
    }

    fn play_track(&mut self, track: &str) -> Result<MockSession, AudioError> {
        if self.fail_tracks {
            return Err(AudioError::Playback {
                track: track.into(),
                message: "unavailable".into(),
            });
        }
        self.log.borrow_mut().push(format!("play {track}"));
        Ok(MockSession {
            name: track.into(),
            log: self.log.clone(),
        })
    }

    fn start_tone(&mut self, pattern: TonePattern, duration_ms: u64) -> Result<(), AudioError> {
        self.log
            .borrow_mut()
            .push(format!("tone {pattern:?} for {duration_ms}"));
        Ok(())
    }

    fn stop_tones(&mut self) {
        self.log.borrow_mut().push("stop_tones".into());
    }
}

const TICK_MS: i64 = 500;

fn at(h: u32, mi: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 6, 15, h, mi, s).unwrap()
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.audio.shuffle_seed = Some(11);
    config
}

fn app_at(
    config: Config,
    start: DateTime<Local>,
) -> (HydrationApp<ManualClock, MockBackend>, ManualClock, CallLog) {
    let clock = ManualClock::new(start);
    let (backend, log) = MockBackend::new();
    let app = HydrationApp::new(config, clock.clone(), backend);
    (app, clock, log)
}

/// Advance in 500 ms ticks until `until` (inclusive), collecting events and
/// checking the playback mutual-exclusion invariant at every step.
fn run_until(
    app: &mut HydrationApp<ManualClock, MockBackend>,
    clock: &ManualClock,
    until: DateTime<Local>,
    events: &mut Vec<Event>,
) {
    while clock.now_ms() < until.timestamp_millis() {
        clock.advance_ms(TICK_MS);
        events.extend(app.tick());
        assert!(
            !(app.hydration_playing() && app.siren_playing()),
            "both playback flags set at {}",
            clock.now()
        );
    }
}

#[test]
fn scenario_reminder_fires_and_cycle_advances() {
    let (mut app, clock, _log) = app_at(test_config(), at(10, 0, 0));
    app.start().unwrap();
    assert_eq!(app.timer().deadline_ms(), at(10, 20, 0).timestamp_millis());

    let mut events = Vec::new();
    run_until(&mut app, &clock, at(10, 19, 59), &mut events);
    assert!(
        !events.iter().any(|e| matches!(e, Event::HydrationDue { .. })),
        "no playback before the deadline"
    );

    run_until(&mut app, &clock, at(10, 20, 0), &mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::HydrationDue { cycle: 1, .. })));
    assert!(app.hydration_playing());

    // 30 s play + settle, detected on the following tick.
    run_until(&mut app, &clock, at(10, 20, 31), &mut events);
    assert!(!app.hydration_playing());
    let advanced = events
        .iter()
        .find_map(|e| match e {
            Event::CycleAdvanced {
                cycle,
                deadline_ms,
                at_ms,
            } => Some((*cycle, *deadline_ms, *at_ms)),
            _ => None,
        })
        .expect("cycle advanced after session completion");
    assert_eq!(advanced.0, 2);
    // Next cycle counts from the completion instant.
    assert_eq!(advanced.1, advanced.2 + 20 * 60 * 1000);
    assert_eq!(app.timer().cycle(), 2);
}

#[test]
fn scenario_siren_preempts_hydration_and_break_runs_out() {
    // Deadline lands at 10:24:50 so the 10:25:00 siren hits mid-playback.
    let (mut app, clock, log) = app_at(test_config(), at(10, 4, 50));
    app.start().unwrap();

    let mut events = Vec::new();
    run_until(&mut app, &clock, at(10, 24, 55), &mut events);
    assert!(app.hydration_playing());

    run_until(&mut app, &clock, at(10, 25, 0), &mut events);
    // Break window authoritative immediately, fast fade on hydration audio.
    assert!(app.siren_playing());
    assert!(!app.hydration_playing());
    let break_end = at(10, 45, 0).timestamp_millis();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::BreakStarted { kind: BreakKind::Short, end_ms, .. } if *end_ms == break_end)));
    assert!(events.iter().any(
        |e| matches!(e, Event::HydrationFinished { preempted: true, .. })
    ));
    assert!(log.borrow().iter().any(|c| c.contains("level 0 over 200")));

    // Countdown display switches to break-remaining mode.
    let snapshot = app.snapshot();
    assert_eq!(snapshot.countdown_text, "20:00");
    assert_eq!(
        snapshot.break_info.as_deref(),
        Some("Break in progress. 20 min remaining.")
    );

    // No cycle advance happened during the break.
    assert_eq!(app.timer().cycle(), 1);

    // Scenario D: the break elapses while the timer is running; the next
    // tick clears it and restarts a fresh interval from the boundary.
    run_until(&mut app, &clock, at(10, 45, 0), &mut events);
    let resumed = events
        .iter()
        .find_map(|e| match e {
            Event::BreakEnded {
                resumed: true,
                deadline_ms,
                ..
            } => *deadline_ms,
            _ => None,
        })
        .expect("break ended while running");
    assert_eq!(resumed, at(11, 5, 0).timestamp_millis());
    assert_eq!(app.timer().cycle(), 1);
    assert!(app.snapshot().break_info.is_none());
}

#[test]
fn scenario_next_occurrence_rolls_past_today() {
    let base = at(10, 26, 0);
    let next = next_occurrence(&base, 10, 25);
    let tomorrow = Local.with_ymd_and_hms(2026, 6, 16, 10, 25, 0).unwrap();
    assert_eq!(next, tomorrow);
}

#[test]
fn scenario_foreground_resync_fires_on_next_tick() {
    let (mut app, clock, _log) = app_at(test_config(), at(10, 0, 0));
    app.start().unwrap();

    // Backgrounded past the deadline: no ticks arrive for 21.5 minutes.
    clock.set(at(10, 21, 30));
    app.on_foreground();
    assert_eq!(app.timer().deadline_ms(), clock.now_ms());

    let mut events = Vec::new();
    run_until(&mut app, &clock, at(10, 21, 31), &mut events);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::HydrationDue { .. })));
}

#[test]
fn concurrent_siren_firings_drop_the_second() {
    let mut config = test_config();
    config.sirens = vec![
        SirenEntry {
            hour: 10,
            minute: 25,
            label: "Break Siren".into(),
            kind: BreakKind::Short,
        },
        SirenEntry {
            hour: 10,
            minute: 25,
            label: "Lunch Siren".into(),
            kind: BreakKind::Lunch,
        },
    ];
    let (mut app, clock, _log) = app_at(config, at(10, 24, 0));
    app.start().unwrap();

    let mut events = Vec::new();
    run_until(&mut app, &clock, at(10, 26, 0), &mut events);

    let fired: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::SirenFired { .. }))
        .collect();
    let breaks: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::BreakStarted { .. }))
        .collect();
    assert_eq!(fired.len(), 1, "second siren is dropped, not queued");
    assert_eq!(breaks.len(), 1, "a dropped siren opens no break window");
    assert_eq!(app.timer().break_kind(), Some(BreakKind::Short));
}

#[test]
fn reset_returns_to_initial_cycle_and_cuts_audio() {
    let (mut app, clock, log) = app_at(test_config(), at(10, 0, 0));
    app.start().unwrap();
    let mut events = Vec::new();
    run_until(&mut app, &clock, at(10, 20, 5), &mut events);
    assert!(app.hydration_playing());

    app.reset();
    assert!(!app.hydration_playing());
    assert!(log.borrow().iter().any(|c| c.ends_with("stop")));

    let snapshot = app.snapshot();
    assert_eq!(snapshot.cycle_text, "Cycle 1");
    assert_eq!(snapshot.countdown_text, "20:00");
    assert!(snapshot.can_start);
    assert!(!snapshot.can_stop);
    assert!(!snapshot.can_reset);
}

#[test]
fn unlock_failure_surfaces_and_blocks_start() {
    let start = at(9, 0, 0);
    let clock = ManualClock::new(start);
    let (mut backend, _log) = MockBackend::new();
    backend.fail_unlock = true;
    let mut app = HydrationApp::new(test_config(), clock.clone(), backend);

    let err = app.start().unwrap_err();
    assert!(matches!(err, AudioError::UnlockFailed(_)));
    assert!(app.status().contains("Try Start again"));
    assert!(!app.timer().running());
    assert!(app.snapshot().can_start);

    // Not retried automatically; the next explicit start fails the same way.
    assert!(app.start().is_err());
}

#[test]
fn playback_failure_degrades_to_tone_and_still_advances() {
    let start = at(10, 0, 0);
    let clock = ManualClock::new(start);
    let (mut backend, log) = MockBackend::new();
    backend.fail_tracks = true;
    let mut app = HydrationApp::new(test_config(), clock.clone(), backend);
    app.start().unwrap();

    let mut events = Vec::new();
    run_until(&mut app, &clock, at(10, 20, 31), &mut events);
    assert!(log
        .borrow()
        .iter()
        .any(|c| c.contains("tone HydrationPulse")));
    assert!(events.iter().any(
        |e| matches!(e, Event::HydrationFinished { fallback: true, preempted: false, .. })
    ));
    assert_eq!(app.timer().cycle(), 2);
}

#[test]
fn full_day_keeps_invariants_and_fires_all_sirens() {
    let (mut app, clock, _log) = app_at(test_config(), at(9, 0, 0));
    app.start().unwrap();

    let mut events = Vec::new();
    run_until(&mut app, &clock, at(16, 0, 0), &mut events);

    let sirens = events
        .iter()
        .filter(|e| matches!(e, Event::SirenFired { .. }))
        .count();
    let breaks = events
        .iter()
        .filter(|e| matches!(e, Event::BreakStarted { .. }))
        .count();
    let break_ends = events
        .iter()
        .filter(|e| matches!(e, Event::BreakEnded { .. }))
        .count();
    assert_eq!(sirens, 3);
    assert_eq!(breaks, 3);
    assert_eq!(break_ends, 3);
    // 9:00-16:00 minus 20+60+20 minutes of breaks leaves room for a
    // steady 20-minute cadence.
    assert!(app.timer().cycle() > 10, "cycle was {}", app.timer().cycle());
    assert!(app.timer().running());
}

proptest! {
    #[test]
    fn stop_start_round_trip_preserves_deadline(elapsed in 0i64..20 * 60 * 1000) {
        let t0 = at(10, 0, 0).timestamp_millis();
        let interval = 20 * 60 * 1000u64;
        let mut timer = CycleTimer::new(interval, t0);
        timer.start(t0);
        timer.stop(t0 + elapsed);
        timer.start(t0 + elapsed);
        prop_assert_eq!(timer.deadline_ms(), t0 + interval as i64);
    }
}
