//! Burst options and the TOML file the terminal host reads them from.
//!
//! ```toml
//! [burst]
//! type = "coins"
//! intensity = "epic"
//! loop = true
//!
//! [host]
//! bg_color = "1a1b26"
//! scale = 0.25
//! ```

use crate::color::Color;
use crate::error::ConfigError;
use crate::particle::{DecayMode, LIFE_DECAY};
use serde::Deserialize;
use std::path::Path;

/// Default culling distance below the bottom edge of the surface.
pub const OFF_SCREEN_MARGIN: f32 = 50.0;
/// Default life lost per second when decay follows the clock.
pub const LIFE_DECAY_PER_SECOND: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayClock {
    /// Fixed decrement per delivered frame.
    #[default]
    Tick,
    /// Decrement scaled by elapsed time.
    Seconds,
}

/// Everything a caller passes when activating a celebration, except the
/// completion callback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BurstOptions {
    /// Celebration type name; unknown names behave like `confetti`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Intensity name; unknown names behave like `normal`.
    pub intensity: String,
    pub active: bool,
    pub origin_x: Option<f32>,
    pub origin_y: Option<f32>,
    /// Start as soon as `active` turns true.
    pub auto_start: bool,
    /// Re-arm after each natural completion while still active.
    #[serde(rename = "loop")]
    pub looping: bool,
    pub sound_enabled: bool,
    pub decay: DecayClock,
    /// Overrides the default decrement for the chosen clock.
    pub life_decay: Option<f32>,
    pub off_screen_margin: f32,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            kind: "confetti".to_string(),
            intensity: "normal".to_string(),
            active: false,
            origin_x: None,
            origin_y: None,
            auto_start: true,
            looping: false,
            sound_enabled: true,
            decay: DecayClock::Tick,
            life_decay: None,
            off_screen_margin: OFF_SCREEN_MARGIN,
        }
    }
}

impl BurstOptions {
    pub fn decay_mode(&self) -> DecayMode {
        match self.decay {
            DecayClock::Tick => DecayMode::PerTick(self.life_decay.unwrap_or(LIFE_DECAY)),
            DecayClock::Seconds => DecayMode::PerSecond(self.life_decay.unwrap_or(LIFE_DECAY_PER_SECOND)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(step) = self.life_decay {
            if !step.is_finite() || step <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    option: "life_decay",
                    reason: format!("must be a positive number, got {step}"),
                });
            }
        }
        if !self.off_screen_margin.is_finite() || self.off_screen_margin < 0.0 {
            return Err(ConfigError::InvalidValue {
                option: "off_screen_margin",
                reason: format!("must be zero or more, got {}", self.off_screen_margin),
            });
        }
        for (option, value) in [("origin_x", self.origin_x), ("origin_y", self.origin_y)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ConfigError::InvalidValue { option, reason: "must be finite".into() });
            }
        }
        Ok(())
    }
}

/// Terminal host settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Background as `RRGGBB`.
    pub bg_color: Option<String>,
    /// Device pixels per logical unit.
    pub scale: f32,
    pub fps: u32,
    /// Fixed seed for reproducible bursts.
    pub seed: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { bg_color: None, scale: 0.25, fps: 60, seed: None }
    }
}

impl HostConfig {
    pub fn background(&self) -> Result<Color, ConfigError> {
        match &self.bg_color {
            Some(hex) => Color::parse_hex(hex),
            None => Ok(Color::BLACK),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                option: "scale",
                reason: format!("must be a positive number, got {}", self.scale),
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidValue { option: "fps", reason: "must be at least 1".into() });
        }
        self.background().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub burst: BurstOptions,
    pub host: HostConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: FileConfig = toml::from_str(text)?;
        config.burst.validate()?;
        config.host.validate()?;
        Ok(config)
    }
}
