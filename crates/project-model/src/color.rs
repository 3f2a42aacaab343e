//! Closed lookup tables for labels, marker colors, alpha and field modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label color attached to bins, clips and sequences (`<label2>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    #[default]
    Mango,
    Rose,
    Forest,
    Cerulean,
    Lavender,
    Caribbean,
    Iris,
    Violet,
}

impl LabelColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelColor::Mango => "Mango",
            LabelColor::Rose => "Rose",
            LabelColor::Forest => "Forest",
            LabelColor::Cerulean => "Cerulean",
            LabelColor::Lavender => "Lavender",
            LabelColor::Caribbean => "Caribbean",
            LabelColor::Iris => "Iris",
            LabelColor::Violet => "Violet",
        }
    }
}

impl fmt::Display for LabelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ARGB channels of a marker color as Resolve expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Argb {
    const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }
}

/// Marker color.
///
/// Premiere identifies colors by an opaque numeric code; green is its
/// default and has no code. Resolve reads plain ARGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
    White,
}

impl MarkerColor {
    pub const ALL: [MarkerColor; 6] = [
        MarkerColor::Red,
        MarkerColor::Green,
        MarkerColor::Blue,
        MarkerColor::Orange,
        MarkerColor::Yellow,
        MarkerColor::White,
    ];

    /// Premiere `<pproColor>` code, `None` for the default green.
    pub fn premiere_code(&self) -> Option<&'static str> {
        match self {
            MarkerColor::Red => Some("4281740498"),
            MarkerColor::Green => None,
            MarkerColor::Blue => Some("4294741314"),
            MarkerColor::Orange => Some("4280578025"),
            MarkerColor::Yellow => Some("4281049552"),
            MarkerColor::White => Some("4294967295"),
        }
    }

    pub fn argb(&self) -> Argb {
        match self {
            MarkerColor::Red => Argb::new(0, 255, 0, 0),
            MarkerColor::Green => Argb::new(0, 48, 191, 72),
            MarkerColor::Blue => Argb::new(0, 0, 0, 255),
            MarkerColor::Orange => Argb::new(0, 255, 127, 0),
            MarkerColor::Yellow => Argb::new(0, 0, 0, 0),
            MarkerColor::White => Argb::new(0, 0, 0, 0),
        }
    }

    /// Reverse lookup of a Premiere code. Unknown codes mean "no label".
    pub fn from_premiere_code(code: &str) -> Option<MarkerColor> {
        Self::ALL
            .into_iter()
            .find(|color| color.premiere_code() == Some(code.trim()))
    }
}

/// Alpha channel interpretation of a video-family record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    #[default]
    None,
    Straight,
}

impl AlphaMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlphaMode::None => "none",
            AlphaMode::Straight => "straight",
        }
    }
}

/// Interlacing field order; `None` is progressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldDominance {
    #[default]
    None,
    Upper,
    Lower,
}

impl FieldDominance {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldDominance::None => "none",
            FieldDominance::Upper => "upper",
            FieldDominance::Lower => "lower",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premiere_code_round_trip() {
        for color in MarkerColor::ALL {
            if let Some(code) = color.premiere_code() {
                assert_eq!(MarkerColor::from_premiere_code(code), Some(color));
            }
        }
    }

    #[test]
    fn test_unknown_code_is_no_label() {
        assert_eq!(MarkerColor::from_premiere_code("12345"), None);
        assert_eq!(MarkerColor::Green.premiere_code(), None);
    }

    #[test]
    fn test_green_channels() {
        let argb = MarkerColor::Green.argb();
        assert_eq!((argb.alpha, argb.red, argb.green, argb.blue), (0, 48, 191, 72));
    }

    #[test]
    fn test_label_display() {
        assert_eq!(LabelColor::default().to_string(), "Mango");
        assert_eq!(LabelColor::Caribbean.to_string(), "Caribbean");
    }
}
