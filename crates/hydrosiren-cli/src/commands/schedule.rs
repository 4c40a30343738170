use std::path::PathBuf;

use chrono::Local;
use hydrosiren_core::display::format_clock_short;
use hydrosiren_core::{BreakKind, CoreError, SirenScheduler};

/// List each siren with its next occurrence, soonest first.
pub fn run(config_path: Option<PathBuf>) -> Result<(), CoreError> {
    let config = super::load_config(config_path)?;
    let breaks = config.breaks.clone();
    let scheduler: SirenScheduler = SirenScheduler::new(config.sirens);
    let now = Local::now();

    for (entry, when) in scheduler.preview(&now) {
        let minutes = breaks.duration_ms(entry.kind) / 60_000;
        let kind = match entry.kind {
            BreakKind::Short => "break",
            BreakKind::Lunch => "lunch",
        };
        println!(
            "{}  {}  ({kind}, {minutes} min)",
            format_clock_short(&when),
            entry.label,
        );
    }
    Ok(())
}
