// Copyright (c) 2026 rezky_nightky

use crate::color::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Cell {
    pub fn blank(bg: Option<Rgb>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
        }
    }

    /// Same colors as `other`, so both can go out in one print.
    pub fn same_style(&self, other: &Cell) -> bool {
        self.fg == other.fg && self.bg == other.bg
    }
}
