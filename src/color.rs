//! Hex color parsing with a guaranteed fallback.
//!
//! Colors arrive as `#RRGGBB` text from user input and presets. Parsing never
//! fails: malformed input is coerced to [`FALLBACK_COLOR`] and a warning is
//! logged, so a bad color can never abort a render.

use std::str::FromStr;

use image::Rgba;
use palette::{Mix, Srgb};

/// Color used whenever input cannot be parsed.
pub const FALLBACK_COLOR: Srgb<u8> = Srgb::new(0, 0, 0);

/// Opaque white.
pub const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);
/// Opaque black.
pub const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);

/// Parses a `#RRGGBB` string.
///
/// Returns [`FALLBACK_COLOR`] for anything else (wrong length, missing `#`,
/// non-hex digits, empty input).
pub fn parse_color(text: &str) -> Srgb<u8> {
    match try_parse_color(text) {
        Some(color) => color,
        None => {
            tracing::warn!(input = text, "invalid color, using fallback");
            FALLBACK_COLOR
        }
    }
}

/// Parses an optional color, treating `None` like malformed input.
pub fn parse_color_opt(text: Option<&str>) -> Srgb<u8> {
    text.map(parse_color).unwrap_or_else(|| {
        tracing::warn!("missing color, using fallback");
        FALLBACK_COLOR
    })
}

/// Strict parse without the fallback.
pub fn try_parse_color(text: &str) -> Option<Srgb<u8>> {
    let text = text.trim();
    let digits = text.strip_prefix('#')?;
    // palette also accepts the 3-digit short form; only the long form is valid here.
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Srgb::<u8>::from_str(digits).ok()
}

/// Formats a color as `#RRGGBB`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

/// Combines a color with an alpha value into an image pixel.
pub fn with_alpha(color: Srgb<u8>, alpha: u8) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, alpha])
}

/// Linear per-channel interpolation between two colors (`t` in 0..=1).
pub fn lerp(from: Srgb<u8>, to: Srgb<u8>, t: f32) -> Srgb<u8> {
    let from: Srgb<f32> = from.into_format();
    let to: Srgb<f32> = to.into_format();
    from.mix(to, t.clamp(0.0, 1.0)).into_format()
}

/// Gray level with no hue.
pub fn gray(level: u8) -> Srgb<u8> {
    Srgb::new(level, level, level)
}
