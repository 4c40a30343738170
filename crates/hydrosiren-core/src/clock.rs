//! Clock port.
//!
//! Every component in this crate takes the current time as a parameter and
//! never reads the system clock directly; [`Clock`] is the single seam
//! through which wall-clock time enters the application. The CLI uses
//! [`SystemClock`]; tests use [`ManualClock`] to step time deterministically.

use chrono::{DateTime, Local};

/// Source of "now". Local wall-clock time, since the siren schedule is
/// specified in local hours and minutes.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Epoch milliseconds, the unit all deadline arithmetic uses.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A manually advanced clock for tests and simulations. Clones share the
/// same instant, so a test can hold one handle while the app owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<i64>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: std::rc::Rc::new(std::cell::Cell::new(start.timestamp_millis())),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, at: DateTime<Local>) {
        self.now.set(at.timestamp_millis());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        DateTime::from_timestamp_millis(self.now.get())
            .map(|t| t.with_timezone(&Local))
            .unwrap_or_else(Local::now)
    }

    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}
