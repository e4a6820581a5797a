// Score cell coloring: hex parsing, linear interpolation, and the per-week
// red-white-green gradient anchored at the median.

use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Bottom of the gradient (lowest score of the week).
pub const LOW_COLOR: &str = "#b11226";
/// Median white point.
pub const MID_COLOR: &str = "#ffffff";
/// Top of the gradient (highest score of the week).
pub const HIGH_COLOR: &str = "#2e7d32";
/// Background for cells with no score. Never produced by the gradient.
pub const NOT_APPLICABLE_COLOR: &str = "#1a1a1a";

/// Luminance above which dark text is used.
const LUMINANCE_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Perceptual luminance in [0, 1].
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

/// Parse a `#rrggbb` or `rrggbb` color (case-insensitive).
///
/// Returns `None` for any other format, including 3-digit shorthand.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Render a color as lowercase `#rrggbb`. Each channel is clamped to
/// [0, 255] and rounded to the nearest integer.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!("#{:02x}{:02x}{:02x}", to_channel(r), to_channel(g), to_channel(b))
}

fn to_channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0).round() as u8
}

/// Linear interpolation between two colors, per channel:
/// `a + (b - a) * factor`.
///
/// `factor` is not clamped; callers keep it within [0, 1]. If either color
/// fails to parse the result is [`MID_COLOR`].
pub fn interpolate_color(a: &str, b: &str, factor: f64) -> String {
    let (Some(from), Some(to)) = (hex_to_rgb(a), hex_to_rgb(b)) else {
        return MID_COLOR.to_string();
    };
    let lerp = |x: u8, y: u8| x as f64 + (y as f64 - x as f64) * factor;
    rgb_to_hex(
        lerp(from.r, to.r),
        lerp(from.g, to.g),
        lerp(from.b, to.b),
    )
}

// ---------------------------------------------------------------------------
// Score colors
// ---------------------------------------------------------------------------

/// Background color for a score cell.
///
/// Each week is normalized on its own: scores at or below the median move
/// from red (at `min`) to white (at `median`), scores above move from white to
/// green (at `max`). A week with no spread, or with any bound missing, renders
/// white. A missing score renders [`NOT_APPLICABLE_COLOR`].
pub fn score_color(
    score: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    median: Option<f64>,
) -> String {
    let Some(score) = score else {
        return NOT_APPLICABLE_COLOR.to_string();
    };
    let (Some(min), Some(max), Some(median)) = (min, max, median) else {
        return MID_COLOR.to_string();
    };
    if min == max {
        return MID_COLOR.to_string();
    }

    if score <= median {
        if min >= median {
            return MID_COLOR.to_string();
        }
        let factor = (score - min) / (median - min);
        interpolate_color(LOW_COLOR, MID_COLOR, factor)
    } else {
        if max <= median {
            return MID_COLOR.to_string();
        }
        let factor = (score - median) / (max - median);
        interpolate_color(MID_COLOR, HIGH_COLOR, factor)
    }
}

// ---------------------------------------------------------------------------
// Text contrast
// ---------------------------------------------------------------------------

/// Foreground choice for text drawn on a colored cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextColor::Black => "black",
            TextColor::White => "white",
        }
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick black or white text for a background. Unparseable input gets black.
pub fn contrast_text_color(background: &str) -> TextColor {
    match hex_to_rgb(background) {
        Some(rgb) if rgb.luminance() <= LUMINANCE_THRESHOLD => TextColor::White,
        _ => TextColor::Black,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
