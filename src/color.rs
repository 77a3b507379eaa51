use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` literal, used for the built-in palettes.
    pub const fn hex(packed: u32) -> Self {
        Self::rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }

    /// Parse `RRGGBB`, with or without a leading `#`.
    pub fn parse_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.trim_start_matches('#');
        let invalid = || ConfigError::InvalidColor(hex.to_string());
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }

        let r = u8::from_str_radix(&digits[0..2], 16).map_err(|_| invalid())?;
        let g = u8::from_str_radix(&digits[2..4], 16).map_err(|_| invalid())?;
        let b = u8::from_str_radix(&digits[4..6], 16).map_err(|_| invalid())?;

        Ok(Self::rgb(r, g, b))
    }

    /// Linear blend towards `other`; `t` is clamped to [0, 1].
    pub fn mix(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
        Color::rgb(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }

    pub fn lighten(self, amount: f32) -> Color {
        self.mix(Color::WHITE, amount)
    }

    pub fn darken(self, amount: f32) -> Color {
        self.mix(Color::BLACK, amount)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
