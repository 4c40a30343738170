//! Core error types for hydrosiren-core.
//!
//! Nothing in this crate is fatal to the process: playback failures degrade
//! to the synthesized fallback, conflicting playback requests are defined
//! no-ops, and only the one-time audio unlock failure is surfaced to the
//! user (with a retry instruction).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hydrosiren-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audio-related errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Audio-specific errors.
///
/// `Playback` and `Tone` are recovered inside the playback arbiter and never
/// escape it. `UnlockFailed` is the one error shown to the user.
#[derive(Error, Debug)]
pub enum AudioError {
    /// File-backed playback failed (missing, unsupported, rejected).
    #[error("Playback failed for '{track}': {message}")]
    Playback { track: String, message: String },

    /// The one-time gesture-based unlock of the audio output failed.
    #[error("Audio unlock failed: {0}")]
    UnlockFailed(String),

    /// Tone synthesis was unavailable.
    #[error("Tone synthesis failed: {0}")]
    Tone(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
