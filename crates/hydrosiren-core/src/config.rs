//! TOML-based application configuration.
//!
//! Stores the process-start constants:
//! - Hydration interval and reminder play duration
//! - Break/lunch durations and siren play duration
//! - Track rotation and fade windows
//! - The daily siren schedule
//!
//! Configuration is stored at `~/.config/hydrosiren/config.toml`. Every
//! field has a serde default reproducing the stock setup (20-minute
//! hydration cycle, 30-second reminders, two short breaks and a lunch).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The flavor of a scheduled break. Determines the break duration and which
/// synthesized siren pattern the fallback uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Lunch,
}

/// One fixed daily siren, in local wall-clock time. `hour` is 0-23; 12 is
/// noon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SirenEntry {
    pub hour: u32,
    pub minute: u32,
    pub label: String,
    pub kind: BreakKind,
}

/// Hydration timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Hydration interval in minutes.
    #[serde(default = "default_interval_min")]
    pub interval_min: u64,
    /// Reminder playback length in seconds.
    #[serde(default = "default_play_secs")]
    pub play_secs: u64,
}

/// Break configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakConfig {
    /// Short break length in minutes.
    #[serde(default = "default_short_min")]
    pub short_min: u64,
    /// Lunch break length in minutes.
    #[serde(default = "default_lunch_min")]
    pub lunch_min: u64,
    /// Siren playback length in seconds.
    #[serde(default = "default_siren_play_secs")]
    pub siren_play_secs: u64,
}

/// Audio configuration: track rotation and fade envelope windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Hydration track rotation, consumed as a shuffled permutation.
    #[serde(default = "default_tracks")]
    pub tracks: Vec<String>,
    /// The single shared siren track.
    #[serde(default = "default_siren_track")]
    pub siren_track: String,
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u64,
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    /// Trailing settle time after the fade-out before the session releases.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Fast decay window used when a siren preempts hydration audio.
    #[serde(default = "default_preempt_fade_ms")]
    pub preempt_fade_ms: u64,
    /// Nominal output level, 0.0-1.0.
    #[serde(default = "default_level")]
    pub level: f32,
    /// Fixed shuffle seed, for reproducible rotations. None = random.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub breaks: BreakConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default = "default_sirens")]
    pub sirens: Vec<SirenEntry>,
}

fn default_interval_min() -> u64 {
    20
}
fn default_play_secs() -> u64 {
    30
}
fn default_short_min() -> u64 {
    20
}
fn default_lunch_min() -> u64 {
    60
}
fn default_siren_play_secs() -> u64 {
    30
}
fn default_tracks() -> Vec<String> {
    vec![
        "assets/audio/hydration1.mp3".into(),
        "assets/audio/hydration2.mp3".into(),
        "assets/audio/hydration3.mp3".into(),
    ]
}
fn default_siren_track() -> String {
    "assets/audio/siren.mp3".into()
}
fn default_fade_in_ms() -> u64 {
    500
}
fn default_fade_out_ms() -> u64 {
    800
}
fn default_settle_ms() -> u64 {
    50
}
fn default_preempt_fade_ms() -> u64 {
    200
}
fn default_level() -> f32 {
    0.9
}
fn default_sirens() -> Vec<SirenEntry> {
    vec![
        SirenEntry {
            hour: 10,
            minute: 25,
            label: "Break Siren".into(),
            kind: BreakKind::Short,
        },
        SirenEntry {
            hour: 12,
            minute: 25,
            label: "Lunch Siren".into(),
            kind: BreakKind::Lunch,
        },
        SirenEntry {
            hour: 15,
            minute: 5,
            label: "Break Siren".into(),
            kind: BreakKind::Short,
        },
    ]
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            interval_min: default_interval_min(),
            play_secs: default_play_secs(),
        }
    }
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            short_min: default_short_min(),
            lunch_min: default_lunch_min(),
            siren_play_secs: default_siren_play_secs(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            tracks: default_tracks(),
            siren_track: default_siren_track(),
            fade_in_ms: default_fade_in_ms(),
            fade_out_ms: default_fade_out_ms(),
            settle_ms: default_settle_ms(),
            preempt_fade_ms: default_preempt_fade_ms(),
            level: default_level(),
            shuffle_seed: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            breaks: BreakConfig::default(),
            audio: AudioConfig::default(),
            sirens: default_sirens(),
        }
    }
}

impl TimerConfig {
    pub fn interval_ms(&self) -> u64 {
        self.interval_min.saturating_mul(60).saturating_mul(1000)
    }

    pub fn play_ms(&self) -> u64 {
        self.play_secs.saturating_mul(1000)
    }
}

impl BreakConfig {
    pub fn siren_play_ms(&self) -> u64 {
        self.siren_play_secs.saturating_mul(1000)
    }

    /// Break window length for a given kind.
    pub fn duration_ms(&self, kind: BreakKind) -> u64 {
        let minutes = match kind {
            BreakKind::Short => self.short_min,
            BreakKind::Lunch => self.lunch_min,
        };
        minutes.saturating_mul(60).saturating_mul(1000)
    }
}

impl Config {
    /// Default configuration file path (`~/.config/hydrosiren/config.toml`).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hydrosiren")
            .join("config.toml")
    }

    /// Load from `path`, or fall back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Config =
            toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.interval_min == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.interval_min".into(),
                message: "must be at least 1 minute".into(),
            });
        }
        if self.audio.tracks.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "audio.tracks".into(),
                message: "at least one hydration track is required".into(),
            });
        }
        for (i, entry) in self.sirens.iter().enumerate() {
            if entry.hour > 23 {
                return Err(ConfigError::InvalidValue {
                    key: format!("sirens[{i}].hour"),
                    message: format!("{} is out of range 0-23", entry.hour),
                });
            }
            if entry.minute > 59 {
                return Err(ConfigError::InvalidValue {
                    key: format!("sirens[{i}].minute"),
                    message: format!("{} is out of range 0-59", entry.minute),
                });
            }
        }
        Ok(())
    }
}
