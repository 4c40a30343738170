//! Display sink formatting.
//!
//! Pure text formatting for the external UI collaborator: the core never
//! renders anything itself. A [`Snapshot`] is the complete set of strings
//! and enable flags a frontend needs per frame.

use chrono::Timelike;
use serde::Serialize;

use crate::config::BreakKind;

/// One frame of display state, built by `HydrationApp::snapshot`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// 12-hour zero-padded clock, e.g. `09:41:07 AM`.
    pub clock_text: String,
    /// `mm:ss` countdown: hydration remaining, or break remaining while on
    /// break.
    pub countdown_text: String,
    pub status_line: String,
    /// Upcoming sirens sorted by next fire time.
    pub upcoming_sirens: String,
    pub break_info: Option<String>,
    pub cycle_text: String,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_reset: bool,
}

/// `hh:mm:ss AM`, zero-padded, 12-hour.
pub fn format_clock<T: Timelike>(t: &T) -> String {
    let (pm, hour) = t.hour12();
    format!(
        "{:02}:{:02}:{:02} {}",
        hour,
        t.minute(),
        t.second(),
        meridiem(pm)
    )
}

/// `hh:mm AM`, used for the siren summary.
pub fn format_clock_short<T: Timelike>(t: &T) -> String {
    let (pm, hour) = t.hour12();
    format!("{:02}:{:02} {}", hour, t.minute(), meridiem(pm))
}

fn meridiem(pm: bool) -> &'static str {
    if pm {
        "PM"
    } else {
        "AM"
    }
}

/// `mm:ss` from milliseconds, clamped at zero.
pub fn mmss_from_ms(ms: i64) -> String {
    let total_secs = (ms.max(0)) / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Break-status line, minutes remaining rounded up.
pub fn break_info(kind: BreakKind, remaining_ms: i64) -> String {
    let minutes = (remaining_ms.max(0) + 59_999) / 60_000;
    let name = match kind {
        BreakKind::Short => "Break",
        BreakKind::Lunch => "Lunch",
    };
    format!("{name} in progress. {minutes} min remaining.")
}

/// `Upcoming — Lunch Siren: 12:25 PM  •  …` from (label, fire-time) pairs
/// already sorted by fire time. Empty when nothing is scheduled.
pub fn upcoming_line<T: Timelike>(items: &[(String, T)]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let list = items
        .iter()
        .map(|(label, when)| format!("{label}: {}", format_clock_short(when)))
        .collect::<Vec<_>>()
        .join("  \u{2022}  ");
    format!("Upcoming \u{2014} {list}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn clock_is_12_hour_zero_padded() {
        let t = NaiveTime::from_hms_opt(9, 41, 7).unwrap();
        assert_eq!(format_clock(&t), "09:41:07 AM");
        let t = NaiveTime::from_hms_opt(15, 5, 0).unwrap();
        assert_eq!(format_clock(&t), "03:05:00 PM");
    }

    #[test]
    fn clock_handles_midnight_and_noon() {
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(format_clock(&midnight), "12:00:00 AM");
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(format_clock(&noon), "12:00:00 PM");
    }

    #[test]
    fn mmss_clamps_negative_to_zero() {
        assert_eq!(mmss_from_ms(-500), "00:00");
        assert_eq!(mmss_from_ms(0), "00:00");
        assert_eq!(mmss_from_ms(20 * 60 * 1000), "20:00");
        assert_eq!(mmss_from_ms(61_500), "01:01");
    }

    #[test]
    fn break_info_rounds_minutes_up() {
        assert_eq!(
            break_info(BreakKind::Short, 61_000),
            "Break in progress. 2 min remaining."
        );
        assert_eq!(
            break_info(BreakKind::Lunch, 60 * 60 * 1000),
            "Lunch in progress. 60 min remaining."
        );
    }

    #[test]
    fn upcoming_line_joins_sorted_entries() {
        let items = vec![
            (
                "Lunch Siren".to_string(),
                NaiveTime::from_hms_opt(12, 25, 0).unwrap(),
            ),
            (
                "Break Siren".to_string(),
                NaiveTime::from_hms_opt(15, 5, 0).unwrap(),
            ),
        ];
        assert_eq!(
            upcoming_line(&items),
            "Upcoming \u{2014} Lunch Siren: 12:25 PM  \u{2022}  Break Siren: 03:05 PM"
        );
    }

    #[test]
    fn upcoming_line_empty_when_unscheduled() {
        let items: Vec<(String, NaiveTime)> = Vec::new();
        assert_eq!(upcoming_line(&items), "");
    }
}
