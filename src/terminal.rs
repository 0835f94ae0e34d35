use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        })
    }

    /// Buffer only, for tests
    #[cfg(test)]
    pub fn offscreen(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen: false,
        }
    }

    #[cfg(test)]
    pub fn cell(&self, x: u16, y: u16) -> &Cell {
        &self.buffer[y as usize][x as usize]
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Reallocate the buffer after the window changed size
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bold };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    /// Grey out everything drawn so far
    pub fn dim(&mut self) {
        for cell in self.buffer.iter_mut().flatten() {
            if cell.ch != ' ' {
                cell.fg = Some(Color::DarkGrey);
                cell.bold = false;
            }
        }
    }

    /// Copy a block of cells with its top-left corner at `(x, y)`
    pub fn blit(&mut self, x: i32, y: i32, rows: &[Vec<Cell>]) {
        for (dy, row) in rows.iter().enumerate() {
            for (dx, cell) in row.iter().enumerate() {
                self.set(x + dx as i32, y + dy as i32, cell.ch, cell.fg, cell.bold);
            }
        }
    }

    /// Render the entire buffer to screen
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout();
        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in row {
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                match cell.fg {
                    Some(color) => {
                        queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?
                    }
                    None => queue!(out, Print(cell.ch))?,
                }
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
            }
        }
        out.flush()
    }

    /// Next pending input event (non-blocking)
    pub fn check_event(&self) -> io::Result<Option<Event>> {
        if poll(Duration::from_millis(0))? {
            return Ok(Some(read()?));
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

/// Mouse reporting for as long as the guard lives
pub struct MouseCaptureGuard;

impl MouseCaptureGuard {
    pub fn enable() -> io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for MouseCaptureGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Write rows of cells with ANSI colors (for print mode)
pub fn write_ansi<W: Write>(out: &mut W, rows: &[Vec<Cell>]) -> io::Result<()> {
    for row in rows {
        let line_end = row.iter().rposition(|c| c.ch != ' ').map_or(0, |i| i + 1);
        for cell in &row[..line_end] {
            if cell.ch == ' ' {
                write!(out, " ")?;
                continue;
            }
            if cell.bold {
                write!(out, "\x1b[1m")?;
            }
            if let Some(code) = cell.fg.and_then(ansi_code) {
                write!(out, "\x1b[{}m", code)?;
            }
            write!(out, "{}\x1b[0m", cell.ch)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn ansi_code(color: Color) -> Option<String> {
    let code = match color {
        Color::Rgb { r, g, b } => return Some(format!("38;2;{};{};{}", r, g, b)),
        Color::AnsiValue(v) => return Some(format!("38;5;{}", v)),
        // Standard colors (0-7)
        Color::Black => 30,
        Color::DarkRed => 31,
        Color::DarkGreen => 32,
        Color::DarkYellow => 33,
        Color::DarkBlue => 34,
        Color::DarkMagenta => 35,
        Color::DarkCyan => 36,
        Color::Grey => 37,
        // Bright colors (8-15)
        Color::DarkGrey => 90,
        Color::Red => 91,
        Color::Green => 92,
        Color::Yellow => 93,
        Color::Blue => 94,
        Color::Magenta => 95,
        Color::Cyan => 96,
        Color::White => 97,
        _ => return None,
    };
    Some(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(ch: char, fg: Option<Color>) -> Cell {
        Cell { ch, fg, bold: false }
    }

    #[test]
    fn dim_greys_drawn_cells_only() {
        let mut term = Terminal::offscreen(4, 1);
        term.set_str(0, 0, "ab", Some(Color::Cyan), true);
        term.dim();
        assert_eq!(*term.cell(0, 0), Cell { ch: 'a', fg: Some(Color::DarkGrey), bold: false });
        assert_eq!(*term.cell(3, 0), Cell::default());
    }

    #[test]
    fn write_ansi_trims_trailing_blanks() {
        let rows = vec![vec![cell('a', None), cell(' ', None), cell(' ', None)]];
        let mut out = Vec::new();
        write_ansi(&mut out, &rows).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\x1b[0m\n");
    }

    #[test]
    fn write_ansi_colors_cells() {
        let rows = vec![vec![cell('x', Some(Color::Red))]];
        let mut out = Vec::new();
        write_ansi(&mut out, &rows).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[91mx\x1b[0m\n");
    }
}
