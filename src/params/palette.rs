//! Fixed color palette shared by background, shapes and overlay.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tiny_skia::Color;

use crate::error::WallError;

/// 8-bit sRGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to a tiny-skia color with the given opacity (clamped to [0, 1])
    pub fn with_alpha(self, alpha: f32) -> Color {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::from_rgba8(self.r, self.g, self.b, a)
    }

    pub fn opaque(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = WallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| WallError::InvalidConfig(format!("not a #rrggbb color: {}", s)))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| WallError::InvalidConfig(format!("not a #rrggbb color: {}", s)))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = WallError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Which of the three shape colors a shape uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteSlot {
    Primary,
    Secondary,
    Accent,
}

impl PaletteSlot {
    /// Shape colors cycle in index order
    pub fn for_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::Primary,
            1 => Self::Secondary,
            _ => Self::Accent,
        }
    }
}

/// Named colors, fixed for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Rgb,
    pub grid: Rgb,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub ring: Rgb,
    pub shadow: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x0b, 0x10, 0x20),
            grid: Rgb::new(0x7d, 0xd3, 0xfc),
            primary: Rgb::new(0xf4, 0x72, 0xb6),
            secondary: Rgb::new(0xa7, 0x8b, 0xfa),
            accent: Rgb::new(0x34, 0xd3, 0x99),
            ring: Rgb::new(0xfb, 0xbf, 0x24),
            shadow: Rgb::new(0x02, 0x04, 0x0a),
        }
    }
}

impl Palette {
    pub fn shape_color(&self, slot: PaletteSlot) -> Rgb {
        match slot {
            PaletteSlot::Primary => self.primary,
            PaletteSlot::Secondary => self.secondary,
            PaletteSlot::Accent => self.accent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse_and_display() {
        let c: Rgb = "#f472b6".parse().unwrap();
        assert_eq!(c, Rgb::new(0xf4, 0x72, 0xb6));
        assert_eq!(c.to_string(), "#f472b6");

        assert!("f472b6".parse::<Rgb>().is_err());
        assert!("#f472b".parse::<Rgb>().is_err());
        assert!("#zz72b6".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_palette_serializes_as_hex_map() {
        let json = serde_json::to_value(Palette::default()).unwrap();
        assert_eq!(json["primary"], "#f472b6");
        assert_eq!(json["background"], "#0b1020");
    }

    #[test]
    fn test_slot_cycles() {
        assert_eq!(PaletteSlot::for_index(0), PaletteSlot::Primary);
        assert_eq!(PaletteSlot::for_index(4), PaletteSlot::Secondary);
        assert_eq!(PaletteSlot::for_index(5), PaletteSlot::Accent);
    }

    #[test]
    fn test_alpha_is_clamped() {
        let c = Rgb::WHITE.with_alpha(3.0);
        assert_eq!(c.alpha(), 1.0);
        let c = Rgb::WHITE.with_alpha(-1.0);
        assert_eq!(c.alpha(), 0.0);
    }
}
