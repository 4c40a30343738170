//! The foreground reminder loop.
//!
//! A single current-thread task drives the app at a fixed 500 ms cadence.
//! Everything that mutates state happens inside this task, which is what
//! makes the arbiter's check-then-set playback flags sound.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use hydrosiren_core::{Clock, CoreError, HydrationApp, SystemClock};

use crate::audio::BellBackend;

const TICK_MS: u64 = 500;

/// A tick arriving this late means the process was suspended or throttled;
/// resync the deadline before processing, like a window regaining focus.
const RESYNC_GAP_MS: i64 = 5_000;

pub fn run(config_path: Option<PathBuf>, json: bool, paused: bool) -> Result<(), CoreError> {
    let config = super::load_config(config_path)?;
    let clock = SystemClock;
    let mut app = HydrationApp::new(config, clock, BellBackend);

    if !paused {
        app.start()?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last_tick_ms = clock.now_ms();
        let mut ticks: u64 = 0;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now_ms = clock.now_ms();
                    if now_ms - last_tick_ms > RESYNC_GAP_MS {
                        tracing::info!(gap_ms = now_ms - last_tick_ms, "resyncing after suspension");
                        app.on_foreground();
                    }
                    last_tick_ms = now_ms;

                    let events = app.tick();
                    ticks += 1;
                    if json {
                        emit_json(&app, &events, ticks);
                    } else {
                        for event in &events {
                            tracing::info!(?event, "event");
                        }
                        render_line(&app);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    tracing::info!("interrupted, exiting");
                    break;
                }
            }
        }
    });
    Ok(())
}

fn emit_json(
    app: &HydrationApp<SystemClock, BellBackend>,
    events: &[hydrosiren_core::Event],
    ticks: u64,
) {
    for event in events {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
    }
    // A snapshot frame every 5 seconds keeps consumers current without
    // flooding them.
    if ticks % 10 == 0 {
        let frame = serde_json::json!({ "type": "Snapshot", "data": app.snapshot() });
        println!("{frame}");
    }
}

fn render_line(app: &HydrationApp<SystemClock, BellBackend>) {
    let snapshot = app.snapshot();
    let break_part = snapshot
        .break_info
        .map(|info| format!("  |  {info}"))
        .unwrap_or_default();
    print!(
        "\r\x1b[2K{}  |  {}  |  {}{}  |  {}",
        snapshot.clock_text,
        snapshot.countdown_text,
        snapshot.cycle_text,
        break_part,
        snapshot.status_line,
    );
    let _ = std::io::stdout().flush();
}
