//! TerminalRenderer: flushes a pixel buffer to a real terminal.
//!
//! Each terminal cell is an upper half block showing two pixels. Only the
//! pixel buffer's damaged region is re-composed into cells, and only the cell
//! runs that differ from the previous flush are written.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::fb::{Cell, FrameBuffer, Rgb, HALF_BLOCK};
use crate::frame::Presenter;
use crate::pixels::PixelBuffer;

pub struct TerminalRenderer {
    stdout: io::Stdout,
    current: FrameBuffer,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            current: FrameBuffer::new(0, 0),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        // The alternate screen starts blank.
        self.invalidate();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Flush whatever changed in `pixels` since the previous draw.
    pub fn draw(&mut self, pixels: &mut PixelBuffer) -> Result<()> {
        let damage = pixels.take_damage();
        let (w, h) = FrameBuffer::size_for(pixels);

        let full = match &self.last {
            Some(prev) => prev.width() != w || prev.height() != h,
            None => true,
        };

        self.buf.clear();
        if full {
            self.current.resize(w, h);
            self.current.compose(pixels, None);
            encode_full_into(&self.current, &mut self.buf)?;
        } else {
            if damage.is_none() {
                return Ok(());
            }
            self.current.compose(pixels, damage);
            if let Some(prev) = &self.last {
                encode_diff_into(prev, &self.current, &mut self.buf)?;
            }
        }
        self.flush_buf()?;

        if let Some(prev) = self.last.as_mut() {
            prev.clone_from(&self.current);
        } else {
            self.last = Some(self.current.clone());
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Presenter<PixelBuffer> for TerminalRenderer {
    fn present(&mut self, surface: &mut PixelBuffer) -> Result<()> {
        self.draw(surface)
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current: Option<Cell> = None;
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current != Some(cell) {
                apply_colors_into(out, cell)?;
                current = Some(cell);
            }
            out.queue(Print(HALF_BLOCK))?;
        }
        if y + 1 < fb.height() {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode a diff redraw (changed runs) into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut current: Option<Cell> = None;

    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if current != Some(cell) {
                apply_colors_into(out, cell)?;
                current = Some(cell);
            }
            out.queue(Print(HALF_BLOCK))?;
        }
        Ok(())
    })?;

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_colors_into(out: &mut Vec<u8>, cell: Cell) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(cell.upper)))?;
    out.queue(SetBackgroundColor(rgb_to_color(cell.lower)))?;
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        // Size changed: treat everything as dirty in a single pass (row runs).
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    let h = next.height();

    for y in 0..h {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }

            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Rect, Surface};

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn runs(a: &FrameBuffer, b: &FrameBuffer) -> Vec<(u16, u16, u16)> {
        let mut runs = Vec::new();
        for_each_changed_run(a, b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        runs
    }

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let a = FrameBuffer::new(5, 1);
        let mut b = FrameBuffer::new(5, 1);

        for x in 1..=3 {
            b.set(x, 0, Cell { upper: RED, lower: RED });
        }
        assert_eq!(runs(&a, &b), vec![(1, 0, 3)]);
    }

    #[test]
    fn lower_pixel_change_alone_is_a_change() {
        let a = FrameBuffer::new(3, 2);
        let mut b = a.clone();
        b.set(2, 1, Cell { upper: Rgb::default(), lower: RED });
        assert_eq!(runs(&a, &b), vec![(2, 1, 1)]);
    }

    #[test]
    fn resize_marks_every_row() {
        let a = FrameBuffer::new(2, 2);
        let b = FrameBuffer::new(3, 2);
        assert_eq!(runs(&a, &b), vec![(0, 0, 3), (0, 1, 3)]);
    }

    #[test]
    fn diff_of_identical_frames_only_resets() {
        let mut px = PixelBuffer::new(4, 4);
        px.fill_rect(Rect::new(0, 0, 2, 2), RED);
        let (w, h) = FrameBuffer::size_for(&px);
        let mut fb = FrameBuffer::new(w, h);
        fb.compose(&px, None);

        let mut reset = Vec::new();
        reset.queue(ResetColor).unwrap();
        reset.queue(SetAttribute(Attribute::Reset)).unwrap();

        let mut out = Vec::new();
        encode_diff_into(&fb, &fb, &mut out).unwrap();
        assert_eq!(out, reset);
    }

    #[test]
    fn full_redraw_prints_one_glyph_per_cell() {
        let mut px = PixelBuffer::new(3, 4);
        px.fill_rect(Rect::new(0, 0, 3, 1), RED);
        let (w, h) = FrameBuffer::size_for(&px);
        let mut fb = FrameBuffer::new(w, h);
        fb.compose(&px, None);

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
    }
}
