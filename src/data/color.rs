//! Color parsing and the host-selectable palettes.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// A color from one of the enumerated host palettes.
///
/// Hosts send these as lowercase CSS names (`"ivory"`, `"grey"`, ...).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    White,
    Ivory,
    Black,
    #[serde(alias = "gray")]
    Grey,
    Blue,
    Steelblue,
}

impl NamedColor {
    pub fn color32(self) -> Color32 {
        match self {
            NamedColor::White => Color32::WHITE,
            NamedColor::Ivory => Color32::from_rgb(255, 255, 240),
            NamedColor::Black => Color32::BLACK,
            NamedColor::Grey => Color32::from_rgb(128, 128, 128),
            NamedColor::Blue => Color32::from_rgb(0, 0, 255),
            NamedColor::Steelblue => Color32::from_rgb(70, 130, 180),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NamedColor::White => "White",
            NamedColor::Ivory => "Ivory",
            NamedColor::Black => "Black",
            NamedColor::Grey => "Gray",
            NamedColor::Blue => "Blue",
            NamedColor::Steelblue => "Steel Blue",
        }
    }
}

/// Background color choices offered to the host.
pub const BACKGROUND_CHOICES: [NamedColor; 4] = [
    NamedColor::White,
    NamedColor::Ivory,
    NamedColor::Black,
    NamedColor::Grey,
];

/// Text color choices offered to the host.
pub const TEXT_CHOICES: [NamedColor; 4] = [
    NamedColor::Black,
    NamedColor::Grey,
    NamedColor::Ivory,
    NamedColor::White,
];

/// Lasso outline color choices.
pub const LASSO_CHOICES: [NamedColor; 3] = [NamedColor::Black, NamedColor::Ivory, NamedColor::Blue];

/// Selection ring color choices.
pub const SELECTION_CHOICES: [NamedColor; 3] =
    [NamedColor::Black, NamedColor::Ivory, NamedColor::Blue];

/// Fallback for point colors the host sent in a form we cannot read.
pub const UNKNOWN_POINT_COLOR: Color32 = Color32::GRAY;

/// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa` or a name.
pub fn parse_color(s: &str) -> Option<Color32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let named = match s.to_ascii_lowercase().as_str() {
        "white" => Color32::WHITE,
        "ivory" => NamedColor::Ivory.color32(),
        "black" => Color32::BLACK,
        "grey" | "gray" => NamedColor::Grey.color32(),
        "blue" => NamedColor::Blue.color32(),
        "steelblue" => NamedColor::Steelblue.color32(),
        "red" => Color32::from_rgb(255, 0, 0),
        "green" => Color32::from_rgb(0, 128, 0),
        "orange" => Color32::from_rgb(255, 165, 0),
        "purple" => Color32::from_rgb(128, 0, 128),
        "yellow" => Color32::from_rgb(255, 255, 0),
        "transparent" => Color32::TRANSPARENT,
        _ => return None,
    };
    Some(named)
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Color32::from_rgb(nib(0)?, nib(1)?, nib(2)?))
        }
        6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        )),
        _ => None,
    }
}

/// Format a color back to `#rrggbb` for messages and config files.
pub fn to_hex(c: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", c.r(), c.g(), c.b())
}

/// Allocate a distinct color for the given batch index.
pub fn batch_color(index: usize) -> Color32 {
    const PALETTE: [Color32; 10] = [
        Color32::from_rgb(31, 119, 180),
        Color32::from_rgb(255, 127, 14),
        Color32::from_rgb(44, 160, 44),
        Color32::from_rgb(214, 39, 40),
        Color32::from_rgb(148, 103, 189),
        Color32::from_rgb(140, 86, 75),
        Color32::from_rgb(227, 119, 194),
        Color32::from_rgb(127, 127, 127),
        Color32::from_rgb(188, 189, 34),
        Color32::from_rgb(23, 190, 207),
    ];
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#fff"), Some(Color32::WHITE));
        assert_eq!(parse_color("#1F77B4"), Some(Color32::from_rgb(31, 119, 180)));
        assert_eq!(
            parse_color("#00000080"),
            Some(Color32::from_rgba_unmultiplied(0, 0, 0, 128))
        );
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(parse_color("Gray"), parse_color("grey"));
        assert_eq!(parse_color("IVORY"), Some(NamedColor::Ivory.color32()));
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn named_color_serde_accepts_both_greys() {
        let a: NamedColor = serde_json::from_str("\"gray\"").unwrap();
        let b: NamedColor = serde_json::from_str("\"grey\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&NamedColor::Ivory).unwrap(), "\"ivory\"");
    }

    #[test]
    fn hex_round_trip() {
        let c = Color32::from_rgb(1, 2, 250);
        assert_eq!(parse_color(&to_hex(c)), Some(c));
    }
}
