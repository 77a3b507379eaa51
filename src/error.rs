use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid hex color: {0} (expected RRGGBB, e.g. 1a1b26)")]
    InvalidColor(String),

    #[error("invalid value for {option}: {reason}")]
    InvalidValue { option: &'static str, reason: String },
}

/// Failures an audio backend may report. These never leave the cue synthesizer.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available: {0}")]
    Unavailable(String),

    #[error("playback rejected: {0}")]
    Playback(String),
}
