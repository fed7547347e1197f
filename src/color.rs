//! Color-space conversions for sensor readings
//!
//! Readings arrive as `#RRGGBB` strings. This module turns them into RGB
//! triples, HSL (hue in degrees, saturation and lightness in percent) and the
//! base-16 integer value plotted on the chart.
//!
//! All conversions are total: a string that does not match `#RRGGBB` yields
//! [`Rgb::BLACK`], [`Hsl::ZERO`] or a decimal value of `0` instead of an
//! error, so one bad reading cannot take the dashboard down.

use serde::{Deserialize, Serialize};

/// Default color substituted for records without a usable color value
pub const DEFAULT_HEX: &str = "#000000";

/// An 8-bit-per-channel RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Fallback for malformed hex strings
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Render as an uppercase `#RRGGBB` string
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Pack into a single 24-bit integer (`0xRRGGBB`)
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// HSL representation of this color
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let chroma = max - min;
        let s = chroma / (1.0 - (2.0 * l - 1.0).abs());

        // Each sector is 60 degrees wide; red wraps via the +6 offset.
        let sector = if max == r {
            (g - b) / chroma + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / chroma + 2.0
        } else {
            (r - g) / chroma + 4.0
        };
        let h = (sector * 60.0).rem_euclid(360.0);

        Hsl {
            h,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

/// A color in HSL space
///
/// `h` is in degrees `[0, 360)`, `s` and `l` are percentages `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Fallback for malformed hex strings
    pub const ZERO: Hsl = Hsl {
        h: 0.0,
        s: 0.0,
        l: 0.0,
    };

    /// Components rounded half away from zero, as written to exports
    pub fn rounded(&self) -> (i64, i64, i64) {
        (
            self.h.round() as i64,
            self.s.round() as i64,
            self.l.round() as i64,
        )
    }
}

/// Parse a strict `#RRGGBB` string (either case) into its RGB channels
///
/// Returns `None` for anything else, including 3-digit shorthand and a
/// missing `#`.
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Rgb {
        r: ((value >> 16) & 0xFF) as u8,
        g: ((value >> 8) & 0xFF) as u8,
        b: (value & 0xFF) as u8,
    })
}

/// Whether `hex` is a well-formed `#RRGGBB` string
pub fn is_valid_hex(hex: &str) -> bool {
    parse_hex(hex).is_some()
}

/// Convert a hex color to RGB, falling back to black on malformed input
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or(Rgb::BLACK)
}

/// Convert a hex color to HSL, falling back to all-zero on malformed input
pub fn hex_to_hsl(hex: &str) -> Hsl {
    parse_hex(hex).map(Rgb::to_hsl).unwrap_or(Hsl::ZERO)
}

/// Base-16 value of the hex digits (`0..=0xFFFFFF`), `0` on malformed input
pub fn hex_to_decimal(hex: &str) -> u32 {
    parse_hex(hex).map(Rgb::to_u32).unwrap_or(0)
}
