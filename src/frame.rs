// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::color::Rgb;
use crate::flake::Viewport;
use crate::palette::SkyPalette;
use crate::render::Canvas;
use crate::runtime::GlyphSet;

/// Virtual pixels covered by one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 8,
            height: 16,
        }
    }
}

/// One screenful of cells over a sky gradient. Flakes paint into it through
/// [`Canvas`]; the terminal diffs it against what is already on screen.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cell_size: CellSize,
    glyphs: GlyphSet,
    row_bg: Vec<Rgb>,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(
        width: u16,
        height: u16,
        cell_size: CellSize,
        glyphs: GlyphSet,
        sky: &SkyPalette,
    ) -> Self {
        let mut frame = Self {
            width,
            height,
            cell_size,
            glyphs,
            row_bg: Vec::new(),
            cells: vec![Cell::blank(None); width as usize * height as usize],
        };
        frame.set_sky(sky);
        frame
    }

    pub fn set_sky(&mut self, sky: &SkyPalette) {
        self.row_bg = sky.gradient(self.height);
        self.clear();
    }

    /// Wipes all flakes, leaving only the sky.
    pub fn clear(&mut self) {
        let width = self.width as usize;
        if width == 0 {
            return;
        }
        for (row, bg) in self.cells.chunks_mut(width).zip(&self.row_bg) {
            row.fill(Cell::blank(Some(*bg)));
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width as f32 * self.cell_size.width as f32,
            self.height as f32 * self.cell_size.height as f32,
        )
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells[i]
    }

    pub fn set(&mut self, x: u16, y: u16, ch: char, fg: Rgb) {
        if let Some(i) = self.index(x, y) {
            let cell = &mut self.cells[i];
            cell.ch = ch;
            cell.fg = Some(fg);
        }
    }

    /// Writes `text` from `(x, y)` rightward, clipped at the edge.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, fg: Rgb) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(i) = u16::try_from(i) else {
                break;
            };
            let col = x.saturating_add(i);
            if col >= self.width {
                break;
            }
            self.set(col, y, ch, fg);
        }
    }
}

impl Canvas for Frame {
    /// The circle lands in the cell that holds its center.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb) {
        if !(x >= 0.0 && y >= 0.0) {
            return;
        }
        let col = (x / self.cell_size.width.max(1) as f32).floor();
        let row = (y / self.cell_size.height.max(1) as f32).floor();
        if col >= self.width as f32 || row >= self.height as f32 {
            return;
        }
        let ch = self.glyphs.glyph(radius);
        self.set(col as u16, row as u16, ch, color);
    }
}
