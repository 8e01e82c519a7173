// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Linear RGBA colors and the scene background descriptor.

use core::str::FromStr;
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{input}`: expected #RGB, #RRGGBB or `transparent`")]
pub struct ColorParseError {
    /// The rejected input.
    pub input: String,
}

/// RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque color from components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        let channel = |c: u8| f32::from(c) / 255.0;
        Self::rgb(channel(r), channel(g), channel(b))
    }

    /// Components as an array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Multiply RGB by `k`, keeping alpha.
    pub fn scaled(self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a,
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parse `#RRGGBB` or shorthand `#RGB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let digits = s.trim().strip_prefix('#').ok_or_else(err)?;
        // `from_str_radix` tolerates a leading sign.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(err()),
        };
        let hex = u32::from_str_radix(&expanded, 16).map_err(|_| err())?;
        Ok(Self::from_hex(hex))
    }
}

/// What the surface clears to before drawing the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Background {
    /// Opaque (or translucent) clear color.
    Color(Color),
    /// Fully transparent; the host content shows through.
    Transparent,
}

impl Default for Background {
    fn default() -> Self {
        Self::Color(Color::BLACK)
    }
}

impl Background {
    /// Clear color as RGBA (transparent black for [`Background::Transparent`]).
    pub fn clear_color(self) -> [f32; 4] {
        match self {
            Self::Color(c) => c.to_array(),
            Self::Transparent => [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Resolve an optional `color` option, falling back to the opaque default.
    pub fn from_option(color: Option<&str>) -> Result<Self, ColorParseError> {
        color.map_or(Ok(Self::default()), str::parse)
    }
}

impl FromStr for Background {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        s.parse().map(Self::Color)
    }
}
