//! 24-bit RGB colors as they appear on the wire.
//!
//! Colors are carried as `0xRRGGBB` integers. Deserialization also accepts
//! CSS-style hex strings (`"#rrggbb"`, `"#rgb"`, `"0xrrggbb"`) because
//! configuration authors tend to write both.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("color value {0:#x} exceeds 0xffffff")]
    OutOfRange(u64),
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
}

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    pub fn from_hex(hex: u32) -> Result<Self, ColorError> {
        if hex > 0xffffff {
            return Err(ColorError::OutOfRange(hex as u64));
        }
        Ok(Color(hex))
    }

    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(s.to_string()));
        }

        let expanded = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(ColorError::InvalidHex(s.to_string())),
        };

        u32::from_str_radix(&expanded, 16)
            .map(Color)
            .map_err(|_| ColorError::InvalidHex(s.to_string()))
    }

    pub fn hex(&self) -> u32 {
        self.0
    }

    pub fn rgb8(&self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Gamma-encoded components in `[0, 1]`.
    pub fn to_srgb_f32(&self) -> [f32; 3] {
        let [r, g, b] = self.rgb8();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    /// Linear components, for shading into an sRGB surface.
    pub fn to_linear_f32(&self) -> [f32; 3] {
        self.to_srgb_f32().map(srgb_to_linear)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireColor {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireColor::deserialize(deserializer)? {
            WireColor::Number(n) => {
                if n > 0xffffff {
                    return Err(serde::de::Error::custom(ColorError::OutOfRange(n)));
                }
                Ok(Color(n as u32))
            }
            WireColor::Text(s) => Color::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ColorError};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_css_forms() {
        assert_eq!(Color::parse("#ff8800").unwrap().hex(), 0xff8800);
        assert_eq!(Color::parse("#f80").unwrap().hex(), 0xff8800);
        assert_eq!(Color::parse("0x00ff00").unwrap().hex(), 0x00ff00);
        assert!(matches!(
            Color::parse("#12345"),
            Err(ColorError::InvalidHex(_))
        ));
    }

    #[test]
    fn rejects_signs_and_non_hex_digits() {
        for input in ["#+12345", "+fff", "#-1234", "#12 456", "#ggg"] {
            assert_eq!(
                Color::parse(input),
                Err(ColorError::InvalidHex(input.to_string()))
            );
        }
    }

    #[test]
    fn rejects_out_of_range_hex() {
        assert_eq!(
            Color::from_hex(0x1000000),
            Err(ColorError::OutOfRange(0x1000000))
        );
    }

    #[test]
    fn deserializes_number_or_string() {
        let a: Color = serde_json::from_str("16777215").unwrap();
        let b: Color = serde_json::from_str("\"#ffffff\"").unwrap();
        assert_eq!(a, Color::WHITE);
        assert_eq!(b, Color::WHITE);
        assert!(serde_json::from_str::<Color>("16777216").is_err());
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&Color::from_hex(0x336699).unwrap()).unwrap();
        assert_eq!(json, "3368601");
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::WHITE.to_linear_f32(), [1.0, 1.0, 1.0]);
        assert_eq!(Color::BLACK.to_linear_f32(), [0.0, 0.0, 0.0]);
        let mid = Color::from_hex(0x808080).unwrap().to_linear_f32();
        assert!(mid[0] > 0.2 && mid[0] < 0.23);
    }

    #[test]
    fn display_is_css_hex() {
        assert_eq!(Color::from_hex(0x0a0b0c).unwrap().to_string(), "#0a0b0c");
    }
}
