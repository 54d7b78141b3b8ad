use ratatui::prelude::*;

/// Bit for dot `(col, row)` inside one braille cell (2 columns, 4 rows).
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Monochrome dot layer at braille resolution.
///
/// Dot coordinates are signed so shapes may be clipped at the edges;
/// anything outside the grid is dropped.
pub struct BrailleCanvas {
    dots: Vec<bool>,
    pub grid_w: usize,
    pub grid_h: usize,
    cols: usize,
    rows: usize,
}

impl BrailleCanvas {
    /// A canvas covering `cols` x `rows` terminal cells.
    pub fn new(cols: usize, rows: usize) -> Self {
        let grid_w = cols * 2;
        let grid_h = rows * 4;
        Self {
            dots: vec![false; grid_w * grid_h],
            grid_w,
            grid_h,
            cols,
            rows,
        }
    }

    pub fn clear(&mut self) {
        self.dots.fill(false);
    }

    fn index(&self, gx: isize, gy: isize) -> Option<usize> {
        if gx < 0 || gy < 0 {
            return None;
        }
        let (gx, gy) = (gx as usize, gy as usize);
        (gx < self.grid_w && gy < self.grid_h).then(|| gy * self.grid_w + gx)
    }

    #[inline]
    pub fn set(&mut self, gx: isize, gy: isize) {
        if let Some(i) = self.index(gx, gy) {
            self.dots[i] = true;
        }
    }

    #[inline]
    pub fn get(&self, gx: usize, gy: usize) -> bool {
        gx < self.grid_w && gy < self.grid_h && self.dots[gy * self.grid_w + gx]
    }

    /// Bresenham line, endpoints included.
    pub fn line(&mut self, mut x0: isize, mut y0: isize, x1: isize, y1: isize) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Midpoint circle outline.
    pub fn circle(&mut self, cx: isize, cy: isize, r: isize) {
        if r <= 0 {
            self.set(cx, cy);
            return;
        }
        let mut x = r;
        let mut y = 0;
        let mut err = 1 - r;
        while x >= y {
            for (dx, dy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.set(cx + dx, cy + dy);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Filled disc, used for markers.
    pub fn disc(&mut self, cx: isize, cy: isize, r: isize) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set(cx + dx, cy + dy);
                }
            }
        }
    }

    /// Braille glyph for terminal cell `(col, row)`, or None when no dot in
    /// it is set.
    fn glyph(&self, col: usize, row: usize) -> Option<char> {
        let mut bits = 0u8;
        for (dx, column) in DOT_BITS.iter().enumerate() {
            for (dy, &bit) in column.iter().enumerate() {
                if self.get(col * 2 + dx, row * 4 + dy) {
                    bits |= bit;
                }
            }
        }
        if bits == 0 {
            None
        } else {
            char::from_u32(0x2800 + bits as u32)
        }
    }

    /// Stamp every non-empty cell into the frame in `color`. Cells with no
    /// dots are left as they are, so layers compose by drawing order.
    pub fn render(&self, frame: &mut Frame, area: Rect, color: (u8, u8, u8)) {
        let fg = Color::Rgb(color.0, color.1, color.2);
        let buf = frame.buffer_mut();
        for row in 0..self.rows.min(area.height as usize) {
            for col in 0..self.cols.min(area.width as usize) {
                let Some(ch) = self.glyph(col, row) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col as u16, area.y + row as u16)) {
                    cell.set_char(ch);
                    cell.set_fg(fg);
                }
            }
        }
    }
}
