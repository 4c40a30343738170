//! Hydration cycle state machine.
//!
//! A wall-clock-based state machine with no internal threads: the caller
//! feeds `now` (epoch milliseconds) into every operation and drives
//! deadline detection from a periodic tick. Exactly one of `deadline_ms` /
//! `paused_remaining_ms` is authoritative at any instant, selected by
//! `running`.
//!
//! ## States
//!
//! ```text
//! Idle -> Running <-> Paused
//! ```
//!
//! A break is an orthogonal overlay: it can begin while Running or Paused
//! and freezes the countdown until its end instant passes, after which the
//! timer resumes whichever state it was in.

use serde::{Deserialize, Serialize};

use crate::config::BreakKind;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

/// The hydration countdown, cycle counter, and break overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleTimer {
    interval_ms: i64,
    app_started: bool,
    running: bool,
    cycle: u32,
    /// Absolute instant the next reminder fires. Authoritative while
    /// running and not on break.
    deadline_ms: i64,
    /// Frozen remaining time while not running.
    paused_remaining_ms: i64,
    break_end_ms: Option<i64>,
    break_kind: Option<BreakKind>,
}

impl CycleTimer {
    pub fn new(interval_ms: u64, now_ms: i64) -> Self {
        let interval_ms = interval_ms as i64;
        Self {
            interval_ms,
            app_started: false,
            running: false,
            cycle: 1,
            deadline_ms: now_ms + interval_ms,
            paused_remaining_ms: interval_ms,
            break_end_ms: None,
            break_kind: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.app_started {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    pub fn app_started(&self) -> bool {
        self.app_started
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn deadline_ms(&self) -> i64 {
        self.deadline_ms
    }

    pub fn on_break(&self, now_ms: i64) -> bool {
        self.break_end_ms.is_some_and(|end| now_ms < end)
    }

    pub fn break_kind(&self) -> Option<BreakKind> {
        self.break_kind
    }

    pub fn break_remaining_ms(&self, now_ms: i64) -> Option<i64> {
        self.break_end_ms
            .filter(|end| now_ms < *end)
            .map(|end| end - now_ms)
    }

    /// Countdown value for display. May go negative after a missed
    /// deadline; the display clamps, the tick driver reacts.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        if self.running {
            self.deadline_ms - now_ms
        } else {
            self.paused_remaining_ms
        }
    }

    /// True when the tick driver should trigger a reminder session.
    pub fn deadline_crossed(&self, now_ms: i64) -> bool {
        self.running && !self.on_break(now_ms) && self.deadline_ms - now_ms <= 0
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: i64) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        self.app_started = true;
        let resumes_after_break = if self.on_break(now_ms) {
            // Countdown only begins once the break ends.
            self.deadline_ms = self.break_end_ms.unwrap_or(now_ms) + self.interval_ms;
            true
        } else {
            self.deadline_ms = now_ms + self.paused_remaining_ms;
            false
        };
        Some(Event::TimerStarted {
            resumes_after_break,
            deadline_ms: self.deadline_ms,
            at_ms: now_ms,
        })
    }

    pub fn stop(&mut self, now_ms: i64) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        let remaining = self.deadline_ms - now_ms;
        // A deadline already in the past freezes as a full interval, not
        // zero: restarting must not refire instantly.
        self.paused_remaining_ms = if remaining < 0 {
            self.interval_ms
        } else {
            remaining
        };
        Some(Event::TimerPaused {
            remaining_ms: self.paused_remaining_ms,
            at_ms: now_ms,
        })
    }

    pub fn reset(&mut self, now_ms: i64) -> Event {
        self.running = false;
        self.app_started = false;
        self.cycle = 1;
        self.paused_remaining_ms = self.interval_ms;
        self.deadline_ms = now_ms + self.interval_ms;
        self.break_end_ms = None;
        self.break_kind = None;
        Event::TimerReset { at_ms: now_ms }
    }

    /// A siren fired: freeze the countdown until `end_ms`. Cycle and
    /// deadline are left untouched until the break-end transition.
    pub fn begin_break(&mut self, kind: BreakKind, end_ms: i64, now_ms: i64) -> Event {
        self.break_end_ms = Some(end_ms);
        self.break_kind = Some(kind);
        Event::BreakStarted {
            kind,
            end_ms,
            at_ms: now_ms,
        }
    }

    /// Clears an elapsed break. When running, the reminder cycle restarts
    /// fresh from the break boundary; the cycle count is not incremented.
    pub fn end_break_if_elapsed(&mut self, now_ms: i64) -> Option<Event> {
        let end = self.break_end_ms?;
        if now_ms < end {
            return None;
        }
        self.break_end_ms = None;
        self.break_kind = None;
        let deadline_ms = if self.running {
            self.deadline_ms = now_ms + self.interval_ms;
            Some(self.deadline_ms)
        } else {
            None
        };
        Some(Event::BreakEnded {
            resumed: self.running,
            deadline_ms,
            at_ms: now_ms,
        })
    }

    /// A reminder session finished. Off break this advances the cycle; on
    /// break the advance is left to the break-end transition.
    pub fn complete_session(&mut self, now_ms: i64) -> Option<Event> {
        if self.on_break(now_ms) {
            return None;
        }
        self.cycle += 1;
        self.deadline_ms = now_ms + self.interval_ms;
        Some(Event::CycleAdvanced {
            cycle: self.cycle,
            deadline_ms: self.deadline_ms,
            at_ms: now_ms,
        })
    }

    /// Foreground-regain resync: pull a deeply past deadline up to `now`
    /// so the next tick fires exactly one reminder instead of displaying a
    /// large negative countdown.
    pub fn resync(&mut self, now_ms: i64) {
        if self.running && !self.on_break(now_ms) {
            self.deadline_ms = self.deadline_ms.max(now_ms);
        }
    }
}
