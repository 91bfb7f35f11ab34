// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::color::Rgb;
use crate::frame::Frame;
use crate::palette::term_color;
use crate::runtime::ColorMode;

/// What is currently on screen, for diffing the next frame against.
struct Shown {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

pub struct Terminal {
    stdout: Stdout,
    mode: ColorMode,
    shown: Option<Shown>,
    run_buf: String,
    cur_fg: Option<Option<Rgb>>,
    cur_bg: Option<Option<Rgb>>,
}

impl Terminal {
    pub fn new(mode: ColorMode) -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            mode,
            shown: None,
            run_buf: String::with_capacity(64),
            cur_fg: None,
            cur_bg: None,
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn set_colors(&mut self, cell: &Cell) -> Result<()> {
        if self.cur_fg != Some(cell.fg) {
            let fg = cell.fg.and_then(|c| term_color(c, self.mode));
            self.stdout
                .queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            self.cur_fg = Some(cell.fg);
        }
        if self.cur_bg != Some(cell.bg) {
            let bg = cell.bg.and_then(|c| term_color(c, self.mode));
            self.stdout
                .queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
            self.cur_bg = Some(cell.bg);
        }
        Ok(())
    }

    /// Sends the cells that differ from the last drawn frame, one print per
    /// run of neighbours sharing colors. Size changes force a full redraw.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let len = frame.width as usize * frame.height as usize;
        let mut shown = match self.shown.take() {
            Some(s) if s.width == frame.width && s.height == frame.height => s,
            _ => {
                self.stdout
                    .queue(terminal::Clear(terminal::ClearType::All))?;
                Shown {
                    width: frame.width,
                    height: frame.height,
                    cells: vec![Cell::blank(None); len],
                }
            }
        };
        self.cur_fg = None;
        self.cur_bg = None;

        let width = frame.width as usize;
        for y in 0..frame.height {
            let row_start = y as usize * width;
            let mut x = 0usize;
            while x < width {
                let idx = row_start + x;
                let cell = frame.cell_at_index(idx);
                if shown.cells[idx] == cell {
                    x += 1;
                    continue;
                }

                self.run_buf.clear();
                self.run_buf.push(cell.ch);
                shown.cells[idx] = cell;
                let mut end = x + 1;
                while end < width {
                    let next = frame.cell_at_index(row_start + end);
                    if shown.cells[row_start + end] == next || !next.same_style(&cell) {
                        break;
                    }
                    self.run_buf.push(next.ch);
                    shown.cells[row_start + end] = next;
                    end += 1;
                }

                self.stdout.queue(cursor::MoveTo(x as u16, y))?;
                self.set_colors(&cell)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;
                x = end;
            }
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.shown = Some(shown);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
