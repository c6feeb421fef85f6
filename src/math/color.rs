use std::fmt;

use serde::{Deserialize, Serialize};

/// Display-space RGB color, serialized as a CSS-style string (`"#eed0d0"`, `"red"`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);
    pub const BLACK: Rgb = Rgb([0.0, 0.0, 0.0]);
    pub const RED: Rgb = Rgb([1.0, 0.0, 0.0]);

    /// Parse `#rgb`, `#rrggbb` or one of a handful of named colors
    pub fn parse(s: &str) -> Option<Rgb> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let rgb = match s.to_ascii_lowercase().as_str() {
            "white" => [1.0, 1.0, 1.0],
            "black" => [0.0, 0.0, 0.0],
            "red" => [1.0, 0.0, 0.0],
            "green" => [0.0, 128.0 / 255.0, 0.0],
            "blue" => [0.0, 0.0, 1.0],
            "orange" => [1.0, 165.0 / 255.0, 0.0],
            "gray" | "grey" => [128.0 / 255.0; 3],
            _ => return None,
        };
        Some(Rgb(rgb))
    }

    fn parse_hex(hex: &str) -> Option<Rgb> {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;

        let channels = match digits.len() {
            3 => [digits[0] * 17, digits[1] * 17, digits[2] * 17],
            6 => [
                digits[0] * 16 + digits[1],
                digits[2] * 16 + digits[3],
                digits[4] * 16 + digits[5],
            ],
            _ => return None,
        };

        Some(Rgb(channels.map(|c| c as f32 / 255.0)))
    }

    pub fn to_array(self) -> [f32; 3] {
        self.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value).ok_or_else(|| format!("invalid color: {:?}", value))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}
