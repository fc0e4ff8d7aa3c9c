use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A theme colour as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Palette index; 0-15 follow the terminal's own 16-colour scheme.
    Ansi(u8),
    Rgb { r: u8, g: u8, b: u8 },
}

/// How many colours the terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorDepth {
    #[default]
    TrueColor,
    Palette256,
}

#[derive(Debug, Error)]
#[error("invalid color value for \"{slot}\": \"{value}\"")]
pub struct ColorParseError {
    pub slot: String,
    pub value: String,
}

/// Names accepted in config, mapped to the 16 standard palette slots.
const NAMED: [(&str, u8); 16] = [
    ("black", 0),
    ("red", 1),
    ("green", 2),
    ("yellow", 3),
    ("blue", 4),
    ("magenta", 5),
    ("cyan", 6),
    ("grey", 7),
    ("dark_grey", 8),
    ("bright_red", 9),
    ("bright_green", 10),
    ("bright_yellow", 11),
    ("bright_blue", 12),
    ("bright_magenta", 13),
    ("bright_cyan", 14),
    ("white", 15),
];

impl Color {
    /// Parse a colour, naming the config slot in the error.
    ///
    /// Accepts a palette index (`"0"`..`"255"`), `#rrggbb`, `#rgb`, or one of
    /// the 16 standard names (`"cyan"`, `"dark_grey"`, ...; `gray` spellings
    /// are accepted too).
    pub fn parse(s: &str, slot: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError {
            slot: slot.to_owned(),
            value: s.to_owned(),
        };
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(err());
            }
            let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
            return match hex.len() {
                6 => Ok(Color::Rgb {
                    r: channel(&hex[0..2])?,
                    g: channel(&hex[2..4])?,
                    b: channel(&hex[4..6])?,
                }),
                3 => Ok(Color::Rgb {
                    r: channel(&hex[0..1])? * 0x11,
                    g: channel(&hex[1..2])? * 0x11,
                    b: channel(&hex[2..3])? * 0x11,
                }),
                _ => Err(err()),
            };
        }

        if let Ok(idx) = trimmed.parse::<u8>() {
            return Ok(Color::Ansi(idx));
        }

        let name = trimmed.to_ascii_lowercase().replace("gray", "grey");
        NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, idx)| Color::Ansi(*idx))
            .ok_or_else(err)
    }

    /// Convert for rendering at the given depth.
    pub fn to_crossterm_color(self, depth: ColorDepth) -> crossterm::style::Color {
        use crossterm::style::Color as Ct;
        match (self, depth) {
            (Color::Ansi(idx), _) => match idx {
                0 => Ct::Black,
                1 => Ct::DarkRed,
                2 => Ct::DarkGreen,
                3 => Ct::DarkYellow,
                4 => Ct::DarkBlue,
                5 => Ct::DarkMagenta,
                6 => Ct::DarkCyan,
                7 => Ct::Grey,
                8 => Ct::DarkGrey,
                9 => Ct::Red,
                10 => Ct::Green,
                11 => Ct::Yellow,
                12 => Ct::Blue,
                13 => Ct::Magenta,
                14 => Ct::Cyan,
                15 => Ct::White,
                n => Ct::AnsiValue(n),
            },
            (Color::Rgb { r, g, b }, ColorDepth::TrueColor) => Ct::Rgb { r, g, b },
            (Color::Rgb { r, g, b }, ColorDepth::Palette256) => Ct::AnsiValue(rgb_to_cube(r, g, b)),
        }
    }
}

impl ColorDepth {
    /// `COLORTERM=truecolor|24bit` means full RGB; anything else gets the
    /// 256-colour palette.
    pub fn detect() -> Self {
        match std::env::var("COLORTERM").as_deref() {
            Ok("truecolor" | "24bit") => ColorDepth::TrueColor,
            _ => ColorDepth::Palette256,
        }
    }
}

/// Nearest entry of the 6x6x6 cube (indices 16-231).
fn rgb_to_cube(r: u8, g: u8, b: u8) -> u8 {
    // Cube levels are 0, 95, 135, 175, 215, 255.
    let level = |v: u8| -> u8 {
        if v < 48 {
            0
        } else if v < 115 {
            1
        } else {
            // (v - 35) / 40 lands in 2..=5 for v >= 115.
            u8::try_from((u16::from(v) - 35) / 40).unwrap_or(5).min(5)
        }
    };
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Ansi(n) => write!(f, "{n}"),
            Color::Rgb { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s, "<color>")
    }
}
