//! Braille dot canvas and the mapping from globe canvas units to terminal cells

use crate::terminal::{Cell, Terminal};
use crossterm::style::Color;

/// Rectangle of terminal cells
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x
            && col < self.x + self.width
            && row >= self.y
            && row < self.y + self.height
    }
}

/// Fits a `canvas_w × canvas_h` drawing into an area of braille dots
/// (2×4 per cell), preserving aspect and centering it.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    area: Area,
    scale: f64,
    offset: (f64, f64),
}

impl Viewport {
    pub fn fit(area: Area, canvas_w: f64, canvas_h: f64) -> Self {
        let dots_w = area.width as f64 * 2.0;
        let dots_h = area.height as f64 * 4.0;
        let scale = (dots_w / canvas_w).min(dots_h / canvas_h).max(f64::MIN_POSITIVE);
        let offset = ((dots_w - canvas_w * scale) / 2.0, (dots_h - canvas_h * scale) / 2.0);
        Self { area, scale, offset }
    }

    /// Dot position, relative to the area, of a canvas point
    pub fn to_dot(&self, p: (f64, f64)) -> (i32, i32) {
        (
            (self.offset.0 + p.0 * self.scale).floor() as i32,
            (self.offset.1 + p.1 * self.scale).floor() as i32,
        )
    }

    /// Absolute terminal cell containing a canvas point
    pub fn to_cell(&self, p: (f64, f64)) -> (i32, i32) {
        let (dx, dy) = self.to_dot(p);
        (self.area.x as i32 + dx.div_euclid(2), self.area.y as i32 + dy.div_euclid(4))
    }

    /// Canvas point at the center of a terminal cell
    pub fn cell_to_canvas(&self, col: u16, row: u16) -> (f64, f64) {
        let dx = (col as f64 - self.area.x as f64) * 2.0 + 1.0;
        let dy = (row as f64 - self.area.y as f64) * 4.0 + 2.0;
        ((dx - self.offset.0) / self.scale, (dy - self.offset.1) / self.scale)
    }

    /// Canvas length in dots
    pub fn dots(&self, length: f64) -> f64 {
        length * self.scale
    }
}

/// Grid of braille dots, each holding a layer code (0 = empty). Higher codes
/// win when layers overlap.
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    dots: Vec<u8>,
}

impl BrailleCanvas {
    pub fn new(cells_w: u16, cells_h: u16) -> Self {
        let width = cells_w as usize * 2;
        let height = cells_h as usize * 4;
        Self { width, height, dots: vec![0; width * height] }
    }

    #[cfg(test)]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.dots[y as usize * self.width + x as usize]
    }

    pub fn plot(&mut self, x: i32, y: i32, layer: u8) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let dot = &mut self.dots[y as usize * self.width + x as usize];
        *dot = (*dot).max(layer);
    }

    /// Bresenham line between two dots
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), layer: u8) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, layer);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Connected polyline through dot positions
    pub fn polyline(&mut self, points: &[(i32, i32)], layer: u8) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], layer);
        }
        if let [only] = points {
            self.plot(only.0, only.1, layer);
        }
    }

    pub fn circle(&mut self, center: (i32, i32), radius: f64, layer: u8) {
        let steps = ((radius * 8.0) as usize).clamp(16, 720);
        let points: Vec<(i32, i32)> = (0..=steps)
            .map(|i| {
                let a = i as f64 / steps as f64 * std::f64::consts::TAU;
                (
                    center.0 + (radius * a.cos()).round() as i32,
                    center.1 + (radius * a.sin()).round() as i32,
                )
            })
            .collect();
        self.polyline(&points, layer);
    }

    /// Braille cells with colors chosen from the strongest layer in each cell
    pub fn to_cells(&self, color: impl Fn(u8) -> (Color, bool)) -> Vec<Vec<Cell>> {
        const DOT_BITS: [(usize, usize, u32); 8] = [
            (0, 0, 0x01), (0, 1, 0x02), (0, 2, 0x04),
            (1, 0, 0x08), (1, 1, 0x10), (1, 2, 0x20),
            (0, 3, 0x40), (1, 3, 0x80),
        ];
        let cells_w = self.width / 2;
        let cells_h = self.height / 4;
        let mut rows = vec![vec![Cell::default(); cells_w]; cells_h];

        for (cy, row) in rows.iter_mut().enumerate() {
            for (cx, cell) in row.iter_mut().enumerate() {
                let mut bits = 0u32;
                let mut strongest = 0u8;
                for &(ox, oy, bit) in &DOT_BITS {
                    let layer = self.dots[(cy * 4 + oy) * self.width + cx * 2 + ox];
                    if layer > 0 {
                        bits |= bit;
                        strongest = strongest.max(layer);
                    }
                }
                if bits > 0 {
                    let (fg, bold) = color(strongest);
                    *cell = Cell {
                        ch: char::from_u32(0x2800 + bits).unwrap_or(' '),
                        fg: Some(fg),
                        bold,
                    };
                }
            }
        }
        rows
    }

    /// Draw onto the terminal, leaving cells without dots untouched
    pub fn blit(&self, term: &mut Terminal, x: u16, y: u16, color: impl Fn(u8) -> (Color, bool)) {
        for (dy, row) in self.to_cells(color).iter().enumerate() {
            for (dx, cell) in row.iter().enumerate() {
                if cell.ch != ' ' {
                    let (cx, cy) = (x as i32 + dx as i32, y as i32 + dy as i32);
                    term.set(cx, cy, cell.ch, cell.fg, cell.bold);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_centers_square_canvas() {
        // 40x10 cells = 80x40 dots; an 800x800 canvas scales by 0.05 and is centered horizontally
        let vp = Viewport::fit(Area::new(0, 0, 40, 10), 800.0, 800.0);
        assert_eq!(vp.to_dot((0.0, 0.0)), (20, 0));
        assert_eq!(vp.to_dot((400.0, 400.0)), (40, 20));
        assert_eq!(vp.to_cell((400.0, 400.0)), (20, 5));
    }

    #[test]
    fn cell_to_canvas_inverts_to_cell() {
        let vp = Viewport::fit(Area::new(3, 2, 60, 20), 800.0, 800.0);
        for &(col, row) in &[(10u16, 5u16), (33, 11), (45, 19)] {
            let p = vp.cell_to_canvas(col, row);
            assert_eq!(vp.to_cell(p), (col as i32, row as i32));
        }
    }

    #[test]
    fn line_reaches_both_ends() {
        let mut canvas = BrailleCanvas::new(10, 5);
        canvas.line((0, 0), (19, 7), 2);
        assert_eq!(canvas.get(0, 0), 2);
        assert_eq!(canvas.get(19, 7), 2);
        canvas.plot(0, 0, 1);
        assert_eq!(canvas.get(0, 0), 2, "lower layer must not overwrite");
    }

    #[test]
    fn cells_encode_braille_bits() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.plot(0, 0, 1);
        canvas.plot(1, 3, 3);
        let cells = canvas.to_cells(|layer| (Color::Green, layer > 2));
        assert_eq!(cells[0][0].ch, char::from_u32(0x2800 + 0x81).unwrap());
        assert!(cells[0][0].bold);
    }

    #[test]
    fn out_of_range_plots_are_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.plot(-1, 0, 1);
        canvas.plot(4, 0, 1);
        canvas.plot(0, 8, 1);
        assert!(canvas.to_cells(|_| (Color::White, false)).iter().flatten().all(|c| c.ch == ' '));
    }
}
