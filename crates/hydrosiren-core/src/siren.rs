//! Daily siren scheduler.
//!
//! For each configured [`SirenEntry`] the scheduler keeps exactly one
//! pending [`Occurrence`]: the nearest future wall-clock instant matching
//! the entry's hour and minute. Occurrences are recomputed with
//! calendar-date arithmetic every time (never a fixed millisecond offset),
//! so DST transitions and leap days resolve correctly.
//!
//! There is no recurring timer and no armed callback: the tick driver polls
//! the table, and each firing re-arms its own successor from the firing
//! instant. `schedule_all` replaces the whole table, which is the
//! cancel-all/reschedule-all path.

use chrono::{DateTime, Days, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};

use crate::config::{BreakKind, SirenEntry};

/// A live binding of a schedule entry to its computed next fire instant.
#[derive(Debug, Clone)]
pub struct Occurrence<Tz: TimeZone> {
    pub entry_index: usize,
    pub fire_at: DateTime<Tz>,
}

/// A siren that has come due in the current poll.
#[derive(Debug, Clone)]
pub struct Firing {
    pub entry_index: usize,
    pub label: String,
    pub kind: BreakKind,
}

/// Resolve a local date + hh:mm against a timezone. An ambiguous local time
/// (DST fall-back) takes the earlier instant; a nonexistent one (DST
/// spring-forward) slides into the following hour.
fn resolve<Tz: TimeZone>(tz: &Tz, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Tz> {
    // hour/minute are validated at config load; clamp rather than panic.
    let time = NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0)
        .unwrap_or(NaiveTime::MIN);
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        }
    }
}

/// The nearest instant strictly after `base` whose local time-of-day is
/// `hour:minute`: today if still ahead, otherwise the next calendar day.
pub fn next_occurrence<Tz: TimeZone>(base: &DateTime<Tz>, hour: u32, minute: u32) -> DateTime<Tz> {
    let tz = base.timezone();
    let today = base.date_naive();
    let candidate = resolve(&tz, today, hour, minute);
    if candidate > *base {
        return candidate;
    }
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    resolve(&tz, tomorrow, hour, minute)
}

/// Owns the pending occurrence for every schedule entry.
#[derive(Debug, Clone)]
pub struct SirenScheduler<Tz: TimeZone = Local> {
    entries: Vec<SirenEntry>,
    occurrences: Vec<Occurrence<Tz>>,
}

impl<Tz: TimeZone> SirenScheduler<Tz> {
    /// Create an unarmed scheduler; call [`schedule_all`](Self::schedule_all)
    /// to arm it.
    pub fn new(entries: Vec<SirenEntry>) -> Self {
        Self {
            entries,
            occurrences: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[SirenEntry] {
        &self.entries
    }

    pub fn is_armed(&self) -> bool {
        !self.occurrences.is_empty()
    }

    /// Drop every pending occurrence and recompute all of them from `now`.
    pub fn schedule_all(&mut self, now: &DateTime<Tz>) {
        self.occurrences = self
            .entries
            .iter()
            .enumerate()
            .map(|(entry_index, entry)| Occurrence {
                entry_index,
                fire_at: next_occurrence(now, entry.hour, entry.minute),
            })
            .collect();
    }

    /// Fire every occurrence whose instant has passed, re-arming each for
    /// its next day. An entry fires at most once per poll even after a long
    /// suspension.
    pub fn poll(&mut self, now: &DateTime<Tz>) -> Vec<Firing> {
        let mut fired = Vec::new();
        for occurrence in &mut self.occurrences {
            if occurrence.fire_at > *now {
                continue;
            }
            let entry = &self.entries[occurrence.entry_index];
            tracing::info!(label = %entry.label, "siren due");
            fired.push(Firing {
                entry_index: occurrence.entry_index,
                label: entry.label.clone(),
                kind: entry.kind,
            });
            // Re-derive from the firing instant; since the matching
            // time-of-day is not strictly ahead of `now`, this lands on the
            // next calendar day.
            occurrence.fire_at = next_occurrence(now, entry.hour, entry.minute);
        }
        fired
    }

    /// Next occurrences computed ad hoc, without arming the table. Feeds
    /// the display before the first start.
    pub fn preview(&self, now: &DateTime<Tz>) -> Vec<(&SirenEntry, DateTime<Tz>)> {
        let mut list: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry, next_occurrence(now, entry.hour, entry.minute)))
            .collect();
        list.sort_by(|a, b| a.1.cmp(&b.1));
        list
    }

    /// Pending occurrences sorted by fire time, for the display sink.
    pub fn upcoming(&self) -> Vec<(&SirenEntry, DateTime<Tz>)> {
        let mut list: Vec<_> = self
            .occurrences
            .iter()
            .map(|o| (&self.entries[o.entry_index], o.fire_at.clone()))
            .collect();
        list.sort_by(|a, b| a.1.cmp(&b.1));
        list
    }
}
