// Copyright (c) 2026 rezky_nightky

use std::fmt;

pub const WHITE: Rgb = Rgb::new(255, 255, 255);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Blend toward `other` by `t` (0 = self, 1 = other), rounding each channel.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8
}

/// Parses `#rrggbb` (the `#` is optional) from its leading hex digits; with
/// none at all the result is black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    let digits = hex.trim().trim_start_matches('#');
    let end = digits
        .bytes()
        .take_while(u8::is_ascii_hexdigit)
        .count();
    let v = u32::from_str_radix(&digits[..end.min(8)], 16).unwrap_or(0);
    Rgb {
        r: ((v >> 16) & 0xff) as u8,
        g: ((v >> 8) & 0xff) as u8,
        b: (v & 0xff) as u8,
    }
}

pub fn rgb_to_hex(c: Rgb) -> String {
    c.to_string()
}

pub fn lerp_color(c1: &str, c2: &str, t: f32) -> String {
    rgb_to_hex(hex_to_rgb(c1).lerp(hex_to_rgb(c2), t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_rgb() {
        let c = hex_to_rgb("#1e162b");
        assert_eq!(c, Rgb::new(0x1e, 0x16, 0x2b));
        assert_eq!(rgb_to_hex(c), "#1e162b");
        assert_eq!(hex_to_rgb("cfd8e3"), Rgb::new(0xcf, 0xd8, 0xe3));
    }

    #[test]
    fn malformed_hex_is_black() {
        assert_eq!(hex_to_rgb("#snow"), Rgb::new(0, 0, 0));
        assert_eq!(hex_to_rgb(""), Rgb::new(0, 0, 0));
    }

    #[test]
    fn hex_reads_the_leading_digits() {
        assert_eq!(hex_to_rgb("12zz"), Rgb::new(0, 0, 0x12));
        assert_eq!(hex_to_rgb("#ff8000;"), Rgb::new(0xff, 0x80, 0x00));
    }

    #[test]
    fn black_to_white_halfway_is_mid_gray() {
        assert_eq!(lerp_color("#000000", "#ffffff", 0.5), "#808080");
    }

    #[test]
    fn lerp_between_equal_colors_is_identity() {
        for t in [0.0, 0.25, 0.65, 1.0] {
            assert_eq!(lerp_color("#797979", "#797979", t), "#797979");
            assert_eq!(lerp_color("#9fb3c8", "#9fb3c8", t), "#9fb3c8");
        }
    }

    #[test]
    fn daylight_blend_of_dark_flake() {
        // 0x79 + (0xff - 0x79) * 0.65 = 208.1
        assert_eq!(lerp_color("#797979", "#ffffff", 0.65), "#d0d0d0");
        assert_eq!(hex_to_rgb("#aaaaaa").lerp(WHITE, 0.65), Rgb::new(225, 225, 225));
    }
}
