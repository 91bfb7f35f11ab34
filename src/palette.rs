// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::color::{hex_to_rgb, Rgb};
use crate::runtime::ColorMode;

const DAY_SKY_TOP: &str = "#9fb3c8";
const DAY_SKY_BOTTOM: &str = "#cfd8e3";
const NIGHT_SKY_TOP: &str = "#000015";
const NIGHT_SKY_BOTTOM: &str = "#1e162b";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkyPalette {
    pub top: Rgb,
    pub bottom: Rgb,
}

impl SkyPalette {
    pub fn day() -> Self {
        Self {
            top: hex_to_rgb(DAY_SKY_TOP),
            bottom: hex_to_rgb(DAY_SKY_BOTTOM),
        }
    }

    pub fn night() -> Self {
        Self {
            top: hex_to_rgb(NIGHT_SKY_TOP),
            bottom: hex_to_rgb(NIGHT_SKY_BOTTOM),
        }
    }

    pub fn for_daylight(daylight: bool) -> Self {
        if daylight {
            Self::day()
        } else {
            Self::night()
        }
    }

    /// One background color per row, top first.
    pub fn gradient(&self, rows: u16) -> Vec<Rgb> {
        match rows {
            0 => Vec::new(),
            1 => vec![self.top],
            _ => {
                let last = (rows - 1) as f32;
                (0..rows)
                    .map(|y| self.top.lerp(self.bottom, y as f32 / last))
                    .collect()
            }
        }
    }
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = (a.r as i32) - (b.r as i32);
    let dg = (a.g as i32) - (b.g as i32);
    let db = (a.b as i32) - (b.b as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

/// Nearest entry of the xterm 6x6x6 cube or the 24-step gray ramp.
pub fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| ((v as u16 * 5) + 127) / 255;
    let (r6, g6, b6) = (level(c.r), level(c.g), level(c.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = if avg < 8 {
        (16, Rgb::new(0, 0, 0))
    } else if avg > 238 {
        (231, Rgb::new(255, 255, 255))
    } else {
        let step = (avg - 8) / 10;
        let v = 8 + 10 * step;
        (232 + step, Rgb::new(v, v, v))
    };

    if dist2(c, gray) < dist2(c, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

pub fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, Rgb::new(0, 0, 0)),
        (Color::DarkGrey, Rgb::new(128, 128, 128)),
        (Color::Grey, Rgb::new(192, 192, 192)),
        (Color::White, Rgb::new(255, 255, 255)),
        (Color::DarkRed, Rgb::new(128, 0, 0)),
        (Color::Red, Rgb::new(255, 0, 0)),
        (Color::DarkGreen, Rgb::new(0, 128, 0)),
        (Color::Green, Rgb::new(0, 255, 0)),
        (Color::DarkBlue, Rgb::new(0, 0, 128)),
        (Color::Blue, Rgb::new(0, 0, 255)),
        (Color::DarkCyan, Rgb::new(0, 128, 128)),
        (Color::Cyan, Rgb::new(0, 255, 255)),
        (Color::DarkMagenta, Rgb::new(128, 0, 128)),
        (Color::Magenta, Rgb::new(255, 0, 255)),
        (Color::DarkYellow, Rgb::new(128, 128, 0)),
        (Color::Yellow, Rgb::new(255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2(c, *rgb))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}

/// What the terminal should actually be sent for `c`; `None` means "leave
/// the terminal default" (mono mode).
pub fn term_color(c: Rgb, mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::Color16 => Some(rgb_to_color16(c)),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_runs_top_to_bottom() {
        let sky = SkyPalette::night();
        let rows = sky.gradient(10);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], Rgb::new(0x00, 0x00, 0x15));
        assert_eq!(rows[9], Rgb::new(0x1e, 0x16, 0x2b));

        assert_eq!(sky.gradient(1), vec![sky.top]);
        assert!(sky.gradient(0).is_empty());
    }

    #[test]
    fn daylight_flag_picks_the_palette() {
        assert_eq!(SkyPalette::for_daylight(true), SkyPalette::day());
        assert_eq!(SkyPalette::for_daylight(false).top, Rgb::new(0, 0, 0x15));
    }

    #[test]
    fn ansi256_matches_exact_cube_and_gray_entries() {
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 255, 255)), 231);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256(Rgb::new(128, 128, 128)), 244);
    }

    #[test]
    fn color16_picks_nearest() {
        assert_eq!(rgb_to_color16(Rgb::new(250, 250, 250)), Color::White);
        assert_eq!(rgb_to_color16(Rgb::new(0x79, 0x79, 0x79)), Color::DarkGrey);
    }

    #[test]
    fn mono_leaves_colors_alone() {
        assert_eq!(term_color(Rgb::new(1, 2, 3), ColorMode::Mono), None);
        assert_eq!(
            term_color(Rgb::new(1, 2, 3), ColorMode::TrueColor),
            Some(Color::Rgb { r: 1, g: 2, b: 3 })
        );
    }
}
