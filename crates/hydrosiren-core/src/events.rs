use serde::{Deserialize, Serialize};

use crate::config::BreakKind;

/// Every observable state change produces an Event. The CLI logs them and,
/// in JSON mode, emits them as lines for external consumers.
///
/// `at_ms` is the epoch-millisecond instant the producing operation ran at,
/// taken from the injected clock rather than a second system-clock read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        /// True when start happened mid-break and the countdown will only
        /// begin at the break boundary.
        resumes_after_break: bool,
        deadline_ms: i64,
        at_ms: i64,
    },
    TimerPaused {
        remaining_ms: i64,
        at_ms: i64,
    },
    TimerReset {
        at_ms: i64,
    },
    /// The hydration deadline was crossed and a reminder session began.
    HydrationDue {
        cycle: u32,
        track: Option<String>,
        at_ms: i64,
    },
    /// A reminder session finished (either path).
    HydrationFinished {
        preempted: bool,
        fallback: bool,
        at_ms: i64,
    },
    /// A completed session rolled the timer into the next cycle.
    CycleAdvanced {
        cycle: u32,
        deadline_ms: i64,
        at_ms: i64,
    },
    SirenFired {
        label: String,
        kind: BreakKind,
        fallback: bool,
        at_ms: i64,
    },
    BreakStarted {
        kind: BreakKind,
        end_ms: i64,
        at_ms: i64,
    },
    BreakEnded {
        /// True when the timer was running and restarted a fresh interval.
        resumed: bool,
        deadline_ms: Option<i64>,
        at_ms: i64,
    },
}
