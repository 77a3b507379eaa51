//! Static celebration tables.
//!
//! Each celebration type maps to one [`ParticleProfile`] and each intensity
//! name maps to one [`IntensityPreset`]. Lookups by name never fail: unknown
//! names resolve to `confetti` and `normal` respectively.

use crate::color::Color;
use crate::particle::ShapeKind;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CelebrationType {
    #[default]
    Confetti,
    Sparkle,
    Coins,
    Hearts,
    Stars,
}

impl CelebrationType {
    pub const ALL: [CelebrationType; 5] = [
        CelebrationType::Confetti,
        CelebrationType::Sparkle,
        CelebrationType::Coins,
        CelebrationType::Hearts,
        CelebrationType::Stars,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CelebrationType::Confetti => "confetti",
            CelebrationType::Sparkle => "sparkle",
            CelebrationType::Coins => "coins",
            CelebrationType::Hearts => "hearts",
            CelebrationType::Stars => "stars",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Like [`from_name`](Self::from_name) but unknown names become the default type.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for CelebrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Intensity {
    Subtle,
    #[default]
    Normal,
    Epic,
    Legendary,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [
        Intensity::Subtle,
        Intensity::Normal,
        Intensity::Epic,
        Intensity::Legendary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Intensity::Subtle => "subtle",
            Intensity::Normal => "normal",
            Intensity::Epic => "epic",
            Intensity::Legendary => "legendary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|i| i.name().eq_ignore_ascii_case(name))
    }

    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    /// Next preset in the cycle, wrapping after legendary.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Emission parameters for one celebration type.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleProfile {
    pub shapes: Vec<ShapeKind>,
    pub colors: Vec<Color>,
    pub count: u32,
    /// Added to `vy` every tick.
    pub gravity: f32,
    /// Width of the emission cone in degrees, centered on straight up.
    pub spread: f32,
}

impl ParticleProfile {
    /// Number of particles one burst creates: `floor(count * multiplier)`.
    pub fn burst_size(&self, preset: &IntensityPreset) -> usize {
        let scaled = f64::from(self.count) * f64::from(preset.multiplier);
        if scaled.is_finite() && scaled > 0.0 {
            scaled.floor() as usize
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityPreset {
    pub multiplier: f32,
    /// Advisory only; burst lifetime is governed by particle decay.
    pub duration: Duration,
}

/// Read-only lookup tables, shared by every engine instance that uses them.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    profiles: [ParticleProfile; 5],
    presets: [IntensityPreset; 4],
}

impl Registry {
    pub fn builtin() -> Self {
        use ShapeKind::*;

        Self {
            profiles: [
                ParticleProfile {
                    shapes: vec![Square, Rectangle, Circle],
                    colors: vec![
                        Color::hex(0xFF6B6B),
                        Color::hex(0x4ECDC4),
                        Color::hex(0x45B7D1),
                        Color::hex(0x96CEB4),
                        Color::hex(0xFFEAA7),
                        Color::hex(0xDDA0DD),
                    ],
                    count: 150,
                    gravity: 0.3,
                    spread: 120.0,
                },
                ParticleProfile {
                    shapes: vec![Star, Circle],
                    colors: vec![
                        Color::hex(0xFFD700),
                        Color::hex(0xFFF8DC),
                        Color::hex(0xFFFFFF),
                        Color::hex(0xF0E68C),
                    ],
                    count: 50,
                    gravity: 0.1,
                    spread: 360.0,
                },
                ParticleProfile {
                    shapes: vec![Coin],
                    colors: vec![Color::hex(0xFFD700), Color::hex(0xFFA500), Color::hex(0xDAA520)],
                    count: 30,
                    gravity: 0.5,
                    spread: 60.0,
                },
                ParticleProfile {
                    shapes: vec![Heart],
                    colors: vec![
                        Color::hex(0xFF69B4),
                        Color::hex(0xFF1493),
                        Color::hex(0xDC143C),
                        Color::hex(0xFFB6C1),
                    ],
                    count: 40,
                    gravity: 0.15,
                    spread: 90.0,
                },
                ParticleProfile {
                    shapes: vec![Star],
                    colors: vec![
                        Color::hex(0xFFD700),
                        Color::hex(0xFFFF00),
                        Color::hex(0xFFA500),
                        Color::hex(0xFFFFFF),
                    ],
                    count: 60,
                    gravity: 0.2,
                    spread: 180.0,
                },
            ],
            presets: [
                IntensityPreset { multiplier: 0.5, duration: Duration::from_millis(2000) },
                IntensityPreset { multiplier: 1.0, duration: Duration::from_millis(3000) },
                IntensityPreset { multiplier: 1.5, duration: Duration::from_millis(4000) },
                IntensityPreset { multiplier: 2.0, duration: Duration::from_millis(5000) },
            ],
        }
    }

    pub fn profile(&self, kind: CelebrationType) -> &ParticleProfile {
        &self.profiles[kind.index()]
    }

    pub fn preset(&self, intensity: Intensity) -> &IntensityPreset {
        &self.presets[intensity.index()]
    }

    /// Profile by name; unknown names get the confetti profile.
    pub fn profile_for(&self, name: &str) -> &ParticleProfile {
        self.profile(CelebrationType::resolve(name))
    }

    /// Preset by name; unknown names get the normal preset.
    pub fn preset_for(&self, name: &str) -> &IntensityPreset {
        self.preset(Intensity::resolve(name))
    }

    /// Replace one profile. Intended for custom tables and tests.
    pub fn with_profile(mut self, kind: CelebrationType, profile: ParticleProfile) -> Self {
        self.profiles[kind.index()] = profile;
        self
    }

    pub fn with_preset(mut self, intensity: Intensity, preset: IntensityPreset) -> Self {
        self.presets[intensity.index()] = preset;
        self
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
