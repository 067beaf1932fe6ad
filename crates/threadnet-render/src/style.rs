//! Colours and sizing shared by every figure.

use plotters::style::RGBColor;

use crate::error::{RenderError, Result};

pub const STEELBLUE: RGBColor = RGBColor(70, 130, 180);
pub const CORAL: RGBColor = RGBColor(255, 127, 80);
pub const LIGHTBLUE: RGBColor = RGBColor(173, 216, 230);
pub const GRAY: RGBColor = RGBColor(128, 128, 128);

/// Viridis anchor colours at evenly spaced stops.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 45, 123),
    (59, 82, 139),
    (44, 114, 142),
    (33, 145, 140),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Parse a colour name or `#rrggbb` hex string.
///
/// # Errors
///
/// Returns [`RenderError::UnknownOption`] for anything else.
pub fn parse_color(name: &str) -> Result<RGBColor> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| RenderError::unknown("colour", name));
    }
    let rgb = match name.to_ascii_lowercase().as_str() {
        "lightblue" => LIGHTBLUE,
        "steelblue" => STEELBLUE,
        "coral" => CORAL,
        "gray" | "grey" => GRAY,
        "lightgray" | "lightgrey" => RGBColor(211, 211, 211),
        "black" => RGBColor(0, 0, 0),
        "white" => RGBColor(255, 255, 255),
        "red" => RGBColor(255, 0, 0),
        "green" => RGBColor(0, 128, 0),
        "blue" => RGBColor(0, 0, 255),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "skyblue" => RGBColor(135, 206, 235),
        "salmon" => RGBColor(250, 128, 114),
        _ => return Err(RenderError::unknown("colour", name)),
    };
    Ok(rgb)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Viridis colour for `t` in `[0, 1]`; values outside are clamped.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lo as f64;
    let (a, b) = (VIRIDIS[lo], VIRIDIS[lo + 1]);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Pixel size for a figure of `inches` at `dpi`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn canvas_size(inches: (f64, f64), dpi: u32) -> (u32, u32) {
    let px = |v: f64| (v * f64::from(dpi)).round().max(1.0) as u32;
    (px(inches.0), px(inches.1))
}

/// Pixels for a length in typographic points at `dpi`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn points(pt: f64, dpi: u32) -> u32 {
    (pt * f64::from(dpi) / 72.0).round().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_hex() {
        assert_eq!(parse_color("lightblue").ok(), Some(LIGHTBLUE));
        assert_eq!(parse_color("SteelBlue").ok(), Some(STEELBLUE));
        assert_eq!(parse_color("#ff7f50").ok(), Some(CORAL));
        assert!(parse_color("#ff7f5").is_err());
        assert!(matches!(
            parse_color("chartreuse-ish"),
            Err(RenderError::UnknownOption { kind: "colour", .. })
        ));
    }

    #[test]
    fn viridis_endpoints_and_clamping() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
        assert_eq!(viridis(0.5), RGBColor(33, 145, 140));
    }

    #[test]
    fn figure_sizes_scale_with_dpi() {
        assert_eq!(canvas_size((15.0, 10.0), 300), (4500, 3000));
        assert_eq!(canvas_size((12.0, 6.0), 100), (1200, 600));
        assert_eq!(points(72.0, 300), 300);
        assert_eq!(points(16.0, 72), 16);
    }
}
