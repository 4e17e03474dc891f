use crate::color::Rgb;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }
}

/// The raster surface the grid is painted onto. Sized once; never resized.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Rgb>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.w && y < self.h {
            Some(self.px[self.idx(x, y)])
        } else {
            None
        }
    }
    pub(crate) fn clear(&mut self, p: Rgb) {
        self.px.fill(p);
    }
    /// Paints a `size`×`size` block with its top-left corner at (x, y), clipped.
    pub(crate) fn fill_block(&mut self, x: u32, y: u32, size: u32, color: Rgb) {
        let x1 = x.saturating_add(size).min(self.w);
        let y1 = y.saturating_add(size).min(self.h);
        for yy in y..y1 {
            let row = self.idx(0, yy);
            for xx in x..x1 {
                self.px[row + xx as usize] = color;
            }
        }
    }
}

/// Alternate-screen session. `cur` is drawn into, `prev` mirrors what the
/// terminal already shows.
pub(crate) struct Terminal {
    out: io::Stdout,
    cols: u16,
    rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    /// Set after the screen was cleared; `prev` no longer matches it.
    repaint: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            repaint: true,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.repaint = true;
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        for (x, y) in dirty_cells(&self.prev, &self.cur, self.repaint) {
            let c = self.cur.cells[self.cur.idx(x, y)];
            queue!(self.out, cursor::MoveTo(x, y))?;
            if last_fg != Some(c.fg) {
                queue!(self.out, SetForegroundColor(c.fg))?;
                last_fg = Some(c.fg);
            }
            if last_bg != Some(c.bg) {
                queue!(self.out, SetBackgroundColor(c.bg))?;
                last_bg = Some(c.bg);
            }
            queue!(self.out, Print(c.ch))?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        self.repaint = false;
        Ok(())
    }
}

/// Row-major positions `present` must print. With `repaint` every cell is
/// returned, otherwise only those that differ from `prev`.
fn dirty_cells(prev: &CellBuffer, cur: &CellBuffer, repaint: bool) -> Vec<(u16, u16)> {
    let mut out = Vec::new();
    for y in 0..cur.h {
        for x in 0..cur.w {
            let i = cur.idx(x, y);
            if repaint || prev.cells.get(i) != Some(&cur.cells[i]) {
                out.push((x, y));
            }
        }
    }
    out
}

/* -----------------------------
   Half-block encoding: 1×2 pixels -> '▀'
------------------------------ */

/// Blits the canvas at terminal cell (x0, y0). Each cell shows two stacked
/// pixels: the top one as foreground, the bottom one as background.
pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, x0: u16, y0: u16) {
    let rows = canvas.h.div_ceil(2);
    for cy in 0..rows {
        let ty = y0 as u32 + cy;
        if ty >= out.h as u32 {
            break;
        }
        for cx in 0..canvas.w {
            let tx = x0 as u32 + cx;
            if tx >= out.w as u32 {
                break;
            }
            let top = canvas.pixel(cx, cy * 2).unwrap_or_default();
            let bottom = canvas.pixel(cx, cy * 2 + 1).unwrap_or_default();
            out.set(
                tx as u16,
                ty as u16,
                Cell {
                    ch: '▀',
                    fg: top.term(),
                    bg: bottom.term(),
                },
            );
        }
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

/// Like `draw_text`, but never writes past column `x + width`.
pub(crate) fn draw_text_clipped(
    buf: &mut CellBuffer,
    x: u16,
    y: u16,
    width: u16,
    s: &str,
    fg: Color,
    bg: Color,
) {
    let clipped: String = s.chars().take(width as usize).collect();
    draw_text(buf, x, y, &clipped, fg, bg);
}

pub(crate) fn draw_box(buf: &mut CellBuffer, x0: u16, y0: u16, bw: u16, bh: u16, fg: Color) {
    if bw < 2 || bh < 2 {
        return;
    }
    let bg = Color::Black;
    let put = |buf: &mut CellBuffer, x: u16, y: u16, ch: char| buf.set(x, y, Cell { ch, fg, bg });

    for y in y0 + 1..y0 + bh - 1 {
        for x in x0 + 1..x0 + bw - 1 {
            put(buf, x, y, ' ');
        }
    }
    for x in x0..x0 + bw {
        put(buf, x, y0, '─');
        put(buf, x, y0 + bh - 1, '─');
    }
    for y in y0..y0 + bh {
        put(buf, x0, y, '│');
        put(buf, x0 + bw - 1, y, '│');
    }
    put(buf, x0, y0, '┌');
    put(buf, x0 + bw - 1, y0, '┐');
    put(buf, x0, y0 + bh - 1, '└');
    put(buf, x0 + bw - 1, y0 + bh - 1, '┘');
}

/// Centered bordered box with a title and a multi-line body.
pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let (w, h) = (buf.w, buf.h);
    let bw = 52.min(w.saturating_sub(4));
    let bh = 16.min(h.saturating_sub(4));
    if bw < 4 || bh < 4 {
        return;
    }
    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;
    let (fg, bg) = (Color::White, Color::Black);

    draw_box(buf, x0, y0, bw, bh, fg);
    draw_text_clipped(buf, x0 + 2, y0 + 1, bw - 4, title, fg, bg);

    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text_clipped(buf, x0 + 2, yy, bw - 4, line, fg, bg);
        yy += 1;
    }
}
