// Copyright (c) 2026 rezky_nightky

use crate::color::{hex_to_rgb, lerp_color, Rgb};
use crate::flake::Flake;

const SMALL_FLAKE: &str = "#797979";
const MEDIUM_FLAKE: &str = "#aaaaaa";
const LARGE_FLAKE: &str = "#ffffff";

/// How far flake colors are washed toward white under a bright sky.
const DAYLIGHT_BLEND: f32 = 0.65;

/// Anything flakes can be painted on.
pub trait Canvas {
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb);
}

/// Flake colors by size class for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlakeShades {
    small: Rgb,
    medium: Rgb,
    large: Rgb,
}

impl FlakeShades {
    pub fn new(daylight: bool) -> Self {
        let shade = |hex: &str| {
            if daylight {
                hex_to_rgb(&lerp_color(hex, LARGE_FLAKE, DAYLIGHT_BLEND))
            } else {
                hex_to_rgb(hex)
            }
        };
        Self {
            small: shade(SMALL_FLAKE),
            medium: shade(MEDIUM_FLAKE),
            large: shade(LARGE_FLAKE),
        }
    }

    /// Fall speed stands in for depth: slow flakes are far away and dim.
    pub fn for_speed(&self, speed: f32) -> Rgb {
        if speed < 1.5 {
            self.small
        } else if speed < 3.0 {
            self.medium
        } else {
            self.large
        }
    }
}

pub fn draw_flake<C: Canvas + ?Sized>(canvas: &mut C, flake: &Flake, shades: &FlakeShades) {
    canvas.fill_circle(flake.x, flake.y, flake.radius, shades.for_speed(flake.speed));
}
