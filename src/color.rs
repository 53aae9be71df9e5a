//! Palette color handling
//!
//! Effect palettes are written as CSS color strings (`rgba(255, 215, 0, 0.8)`,
//! `#ffcc00`, `white`) and stored as [`Rgba<u8>`] so both the raster surface
//! and the browser canvas can consume them.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Neutral tint used by the strong glow treatment.
pub const NEUTRAL_GLOW: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a CSS color string into an RGBA color.
///
/// Hex colors take a fast path; `rgb()`, `rgba()`, `hsl()` and named colors
/// go through lightningcss.
///
/// ```
/// use snowglobe::color::parse_color;
///
/// assert_eq!(parse_color("#FC0").unwrap(), image::Rgba([255, 204, 0, 255]));
/// assert_eq!(parse_color("rgba(255, 140, 0, 0.6)").unwrap(), image::Rgba([255, 140, 0, 153]));
/// assert_eq!(parse_color("white").unwrap(), image::Rgba([255, 255, 255, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_css_color(s),
    }
}

/// Format a color the way a 2D canvas context expects it in `fillStyle`.
///
/// ```
/// use snowglobe::color::to_css_rgba;
///
/// assert_eq!(to_css_rgba(image::Rgba([255, 215, 0, 204])), "rgba(255, 215, 0, 0.8)");
/// ```
pub fn to_css_rgba(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    let alpha = (a as f64 / 255.0 * 1000.0).round() / 1000.0;
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// Normalized alpha channel in `[0, 1]`.
pub fn alpha_of(color: Rgba<u8>) -> f64 {
    color[3] as f64 / 255.0
}

fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    // All characters are ASCII hex digits from here on, so byte indexing is safe.
    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.as_slice() {
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255])),
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2]))
        }
        other => Err(ColorError::InvalidLength(other.len())),
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba([
                unit_to_byte(rgb.r),
                unit_to_byte(rgb.g),
                unit_to_byte(rgb.b),
                unit_to_byte(rgb.alpha),
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
