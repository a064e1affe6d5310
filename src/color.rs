// Simple color struct, created from an unsigned 32 representing RRGGBBAA
// or from a "#rrggbb" string, and formatted as a CSS rgba() value for canvas styles

use serde::Deserialize;
use std::convert::TryFrom;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    // Accent used by the portfolio theme, sky blue
    pub const ACCENT: Color = Color::rgb(14, 165, 233);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16)
                .ok()
                .map(|rgb| Color::from_u32((rgb << 8) | 0xff)),
            8 => u32::from_str_radix(digits, 16).ok().map(Color::from_u32),
            _ => None,
        }
    }

    // The alpha channel of the color is ignored, particles and links carry their own opacity
    pub fn css_rgba(&self, opacity: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, opacity)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u32_splits_channels() {
        let c = Color::from_u32(0x0ea5e980);
        assert_eq!(c, Color { r: 14, g: 165, b: 233, a: 0x80 });
    }

    #[test]
    fn from_hex_accepts_rgb_and_rgba() {
        assert_eq!(Color::from_hex("#0ea5e9"), Some(Color::ACCENT));
        assert_eq!(
            Color::from_hex("0ea5e940"),
            Some(Color { r: 14, g: 165, b: 233, a: 0x40 })
        );
        assert_eq!(Color::from_hex("#0ea5e"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn css_rgba_uses_given_opacity() {
        assert_eq!(Color::ACCENT.css_rgba(0.5), "rgba(14, 165, 233, 0.5)");
        assert_eq!(Color::ACCENT.css_rgba(0.0), "rgba(14, 165, 233, 0)");
    }
}
