// ============================================================================
// COLOUR MODEL — hex parsing, HSV <-> RGB, picker state
// ============================================================================

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::log_warn;

/// HSV used when a hex string cannot be converted (pure red, full strength).
pub const DEFAULT_HSV: Hsv = Hsv { h: 0.0, s: 100.0, v: 100.0 };

/// Hex used when nothing better can be derived.
pub const DEFAULT_HEX: &str = "#000000";

/// Error type for colour conversions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    InvalidHex(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidHex(s) => write!(f, "Invalid hex colour: {:?}", s),
        }
    }
}

impl std::error::Error for ColorError {}

/// Hue in degrees `[0, 360)`, saturation and value in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Colour held by a grid cell. `Transparent` means "no paint".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelColor {
    #[default]
    Transparent,
    Rgb([u8; 3]),
}

impl PixelColor {
    pub fn is_transparent(&self) -> bool {
        matches!(self, PixelColor::Transparent)
    }

    /// Opaque RGBA, or `None` for transparent.
    pub fn to_rgba(&self) -> Option<Rgba<u8>> {
        match *self {
            PixelColor::Transparent => None,
            PixelColor::Rgb([r, g, b]) => Some(Rgba([r, g, b, 255])),
        }
    }
}

impl fmt::Display for PixelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelColor::Transparent => f.write_str("transparent"),
            PixelColor::Rgb(rgb) => f.write_str(&format_hex(*rgb)),
        }
    }
}

impl FromStr for PixelColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("transparent") {
            return Ok(PixelColor::Transparent);
        }
        parse_hex(s).map(PixelColor::Rgb)
    }
}

/// Parse `#rrggbb` / `rrggbb` (either case) into channels.
pub fn parse_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    // from_str_radix tolerates a leading '+', so check the digits ourselves
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| ColorError::InvalidHex(hex.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Lowercase `#rrggbb`.
pub fn format_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// HSV (degrees / percent) to lowercase `#rrggbb`.
///
/// Inputs are clamped first: hue to `[0, 360]`, saturation and value to
/// `[0, 100]`. A hue of exactly 360 lands in the same sector as 0.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> String {
    let h = if h.is_nan() { 0.0 } else { h.clamp(0.0, 360.0) };
    let s = if s.is_nan() { 0.0 } else { s.clamp(0.0, 100.0) } / 100.0;
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) } / 100.0;

    let h6 = h / 60.0;
    let c = v * s;
    let x = c * (1.0 - ((h6 % 2.0) - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h6 as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |ch: f64| ((ch + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format_hex([to_u8(r), to_u8(g), to_u8(b)])
}

/// Like [`hsv_to_rgb`] but wraps the hue modulo 360 instead of clamping it,
/// so `h` and `h + 360` produce the same colour. Used for hue shifts, which
/// go round the colour wheel.
pub fn hsv_to_rgb_wrapped(h: f64, s: f64, v: f64) -> String {
    let h = if h.is_finite() { h.rem_euclid(360.0) } else { 0.0 };
    hsv_to_rgb(h, s, v)
}

/// `#rrggbb` to HSV (degrees / percent).
pub fn rgb_to_hsv(hex: &str) -> Result<Hsv, ColorError> {
    let [r, g, b] = parse_hex(hex)?;
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let h = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / diff).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / diff + 2.0)
    } else {
        60.0 * ((r - g) / diff + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { diff / max * 100.0 };

    Ok(Hsv { h: h % 360.0, s, v: max * 100.0 })
}

/// [`rgb_to_hsv`] with the failure logged and replaced by [`DEFAULT_HSV`].
pub fn rgb_to_hsv_or_default(hex: &str) -> Hsv {
    match rgb_to_hsv(hex) {
        Ok(hsv) => hsv,
        Err(e) => {
            log_warn!("{}; using default HSV", e);
            DEFAULT_HSV
        }
    }
}

/// Resolve a fill colour: `preferred`, else `fallback`, else solid black.
/// The surface always gets a concrete colour.
pub fn resolve_fill_style(preferred: &str, fallback: &str) -> Rgba<u8> {
    match parse_hex(preferred) {
        Ok([r, g, b]) => Rgba([r, g, b, 255]),
        Err(e) => {
            log_warn!("{}; falling back to {:?}", e, fallback);
            match parse_hex(fallback) {
                Ok([r, g, b]) => Rgba([r, g, b, 255]),
                Err(e) => {
                    log_warn!("{}; falling back to black", e);
                    Rgba([0, 0, 0, 255])
                }
            }
        }
    }
}

// ============================================================================
// ColorPicker — HSV + alpha + committed hex
// ============================================================================

/// Picker state behind the colour panel. The hex string is always the
/// conversion of the current HSV; alpha is tracked on its own because hex
/// colours carry no alpha channel.
#[derive(Debug, Clone)]
pub struct ColorPicker {
    hsv: Hsv,
    alpha: f32,
    hex: String,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self {
            hsv: Hsv { h: 0.0, s: 0.0, v: 0.0 },
            alpha: 1.0,
            hex: DEFAULT_HEX.to_string(),
        }
    }
}

impl ColorPicker {
    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn set_hsv(&mut self, h: f64, s: f64, v: f64) {
        self.hsv = Hsv {
            h: h.clamp(0.0, 360.0),
            s: s.clamp(0.0, 100.0),
            v: v.clamp(0.0, 100.0),
        };
        self.hex = hsv_to_rgb(self.hsv.h, self.hsv.s, self.hsv.v);
    }

    /// Shift the hue by `degrees` round the wheel, keeping S and V.
    pub fn rotate_hue(&mut self, degrees: f64) {
        let Hsv { h, s, v } = self.hsv;
        let h = h + degrees;
        self.hex = hsv_to_rgb_wrapped(h, s, v);
        self.hsv.h = if h.is_finite() { h.rem_euclid(360.0) } else { 0.0 };
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
    }

    /// Commit user-typed hex text. Invalid text is ignored and `false` returned.
    pub fn set_hex_text(&mut self, text: &str) -> bool {
        let Ok(rgb) = parse_hex(text) else { return false };
        self.hex = format_hex(rgb);
        self.hsv = rgb_to_hsv_or_default(&self.hex);
        true
    }

    /// Paint colour for the grid (alpha is not part of stored paint).
    pub fn color(&self) -> PixelColor {
        parse_hex(&self.hex)
            .map(PixelColor::Rgb)
            .unwrap_or(PixelColor::Rgb([0, 0, 0]))
    }

    /// Swatch preview colour with alpha applied.
    pub fn rgba(&self) -> Rgba<u8> {
        let [r, g, b] = parse_hex(&self.hex).unwrap_or([0, 0, 0]);
        Rgba([r, g, b, (self.alpha * 255.0).round() as u8])
    }
}
