//! Three-page info panel opened from a marker

use crate::error::DataError;
use crate::species::Species;
use crate::terminal::Cell;
use crossterm::style::Color;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Distribution,
    Threats,
    Trend,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Distribution, Page::Threats, Page::Trend];
    pub const LAST: usize = Page::ALL.len() - 1;

    pub fn index(&self) -> usize {
        match self {
            Page::Distribution => 0,
            Page::Threats => 1,
            Page::Trend => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Page> {
        Page::ALL.get(index).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Distribution => "Global distribution",
            Page::Threats => "Threats to Survival",
            Page::Trend => "Population Trend",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Page {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "distribution" | "map" => Ok(Page::Distribution),
            "1" | "threats" | "pie" => Ok(Page::Threats),
            "2" | "trend" | "population" | "line" => Ok(Page::Trend),
            _ => Err(DataError::UnknownPage(s.to_string())),
        }
    }
}

/// Container a page is rendered into: a fixed-size block of cells.
pub struct Panel {
    width: u16,
    height: u16,
    rows: Vec<Vec<Cell>>,
}

impl Panel {
    /// Smallest panel a page can be drawn into
    pub const MIN_WIDTH: u16 = 30;
    pub const MIN_HEIGHT: u16 = 12;

    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::default(); width as usize]; height as usize],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn is_usable(&self) -> bool {
        self.width >= Self::MIN_WIDTH && self.height >= Self::MIN_HEIGHT
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(Cell::default());
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.rows[y as usize][x as usize] = Cell { ch, fg, bold };
        }
    }

    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    /// Word-wrap `text` into the panel starting at row `y`; returns the next free row.
    pub fn wrap(&mut self, x: i32, y: i32, width: usize, text: &str, fg: Option<Color>) -> i32 {
        let mut row = y;
        for line in wrap_words(text, width) {
            self.set_str(x, row, &line, fg, false);
            row += 1;
        }
        row
    }

    /// Plain text of one row, trailing blanks removed
    #[cfg(test)]
    pub fn line(&self, y: usize) -> String {
        self.rows
            .get(y)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        (0..self.rows.len()).map(|y| self.line(y)).collect::<Vec<_>>().join("\n")
    }
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = match current.chars().count() {
            0 => word_len,
            len => len + 1 + word_len,
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Draws one page for one species. Called once per page transition, onto a
/// freshly cleared panel; implementations must not cache earlier output.
pub trait PageRenderer {
    fn render(&mut self, page: Page, species: Species, panel: &mut Panel);

    /// Readout for the panel cell under the pointer, from the last render
    fn hover(&self, _x: u16, _y: u16) -> Option<String> {
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PagerState {
    Closed,
    Open(Page),
}

/// Panel navigation: closed, or open on one of three pages for the selected species.
pub struct InfoPager {
    state: PagerState,
    selected: Option<Species>,
}

impl Default for InfoPager {
    fn default() -> Self {
        Self::new()
    }
}

impl InfoPager {
    pub fn new() -> Self {
        Self { state: PagerState::Closed, selected: None }
    }

    #[cfg(test)]
    pub fn state(&self) -> PagerState {
        self.state
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<Species> {
        self.selected
    }

    pub fn page(&self) -> Option<Page> {
        match self.state {
            PagerState::Open(page) => Some(page),
            PagerState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PagerState::Open(_))
    }

    /// Back control enabled
    pub fn can_back(&self) -> bool {
        self.page().is_some_and(|p| p.index() > 0)
    }

    /// Next control enabled
    pub fn can_next(&self) -> bool {
        self.page().is_some_and(|p| p.index() < Page::LAST)
    }

    /// Select `species` and show its first page, whatever was open before.
    pub fn open(
        &mut self,
        species: Species,
        renderer: &mut dyn PageRenderer,
        panel: &mut Panel,
    ) -> bool {
        if !panel.is_usable() {
            log::error!(
                "panel {}x{} too small to open {} (need {}x{})",
                panel.width, panel.height, species, Panel::MIN_WIDTH, Panel::MIN_HEIGHT
            );
            return false;
        }
        self.selected = Some(species);
        self.show(Page::Distribution, renderer, panel);
        true
    }

    pub fn next(&mut self, renderer: &mut dyn PageRenderer, panel: &mut Panel) -> bool {
        self.step(1, renderer, panel)
    }

    pub fn back(&mut self, renderer: &mut dyn PageRenderer, panel: &mut Panel) -> bool {
        self.step(-1, renderer, panel)
    }

    /// Redraw the current page, e.g. into a resized panel.
    pub fn refresh(&mut self, renderer: &mut dyn PageRenderer, panel: &mut Panel) -> bool {
        match self.page() {
            Some(page) if panel.is_usable() => {
                self.show(page, renderer, panel);
                true
            }
            Some(_) => {
                log::error!("panel too small to redraw");
                false
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.state = PagerState::Closed;
        self.selected = None;
    }

    fn step(&mut self, delta: isize, renderer: &mut dyn PageRenderer, panel: &mut Panel) -> bool {
        let Some(page) = self.page() else {
            log::debug!("navigation ignored: panel closed");
            return false;
        };
        let Some(target) = page.index().checked_add_signed(delta).and_then(Page::from_index) else {
            return false;
        };
        if !panel.is_usable() {
            log::error!("panel too small to show {}", target);
            return false;
        }
        self.show(target, renderer, panel);
        true
    }

    fn show(&mut self, page: Page, renderer: &mut dyn PageRenderer, panel: &mut Panel) {
        let Some(species) = self.selected else {
            return;
        };
        self.state = PagerState::Open(page);
        panel.clear();
        renderer.render(page, species, panel);
    }
}
