//! Interactive globe view: input, per-frame update, and drawing

use crate::config::GlobeConfig;
use crate::data::Dataset;
use crate::globe::autorotate::{AutoRotate, AutoRotateHandle};
use crate::globe::drag::DragController;
use crate::globe::projection::{Orthographic, RotationState};
use crate::globe::scene::{GlobeScene, RotationCommand};
use crate::globe::{self, land, GlobeArt, CANVAS_HEIGHT, CANVAS_WIDTH, GLOBE_SCALE};
use crate::help::{render_help_overlay, HELP_TEXT};
use crate::markers::{Marker, MarkerEvent, MarkerLayer, MarkerLayout};
use crate::pager::{InfoPager, PageRenderer, Panel};
use crate::panels::DataPages;
use crate::render::{Area, BrailleCanvas, Viewport};
use crate::species::Species;
use crate::terminal::{MouseCaptureGuard, Terminal};
use crossterm::event::{Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::style::Color;
use std::io;
use std::time::Instant;

/// Degrees the arrow keys turn the globe while the panel is closed
const NUDGE: f64 = 10.0;

const CONTROL_ON: Color = Color::White;
const CONTROL_OFF: Color = Color::DarkGrey;
const FRAME: Color = Color::DarkGrey;
const READOUT: Color = Color::Yellow;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Control {
    Back,
    Next,
    Close,
}

/// Screen regions for one terminal size. The panel overlays the right side
/// of the globe; the last row is the status line.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    globe: Area,
    panel: Area,
    content: Area,
    back: Area,
    next: Area,
    close: Area,
    status_row: u16,
}

impl Layout {
    fn new(width: u16, height: u16) -> Self {
        let rows = height.saturating_sub(1);
        let panel_w = (width as u32 * 55 / 100) as u16;
        let panel = Area::new(width - panel_w, 0, panel_w, rows);
        // Border on every side plus one row for the controls
        let content =
            Area::new(panel.x + 1, panel.y + 1, panel_w.saturating_sub(2), rows.saturating_sub(3));
        let controls_row = (panel.y + panel.height).saturating_sub(2);
        Self {
            globe: Area::new(0, 0, width, rows),
            panel,
            content,
            back: Area::new(content.x, controls_row, 3, 1),
            next: Area::new(content.x + 4, controls_row, 3, 1),
            close: Area::new((content.x + content.width).saturating_sub(3), controls_row, 3, 1),
            status_row: rows,
        }
    }

    fn control_at(&self, col: u16, row: u16) -> Option<Control> {
        [(self.back, Control::Back), (self.next, Control::Next), (self.close, Control::Close)]
            .into_iter()
            .find(|(area, _)| area.contains(col, row))
            .map(|(_, control)| control)
    }
}

struct App {
    layout: Layout,
    viewport: Viewport,
    scene: GlobeScene,
    art: GlobeArt,
    auto: AutoRotate,
    spin: Option<AutoRotateHandle>,
    markers: MarkerLayer,
    pager: InfoPager,
    pages: DataPages,
    panel: Panel,
    /// Pointer cell and the page readout under it
    hover: Option<(u16, u16, String)>,
    show_help: bool,
}

impl App {
    fn new(config: &GlobeConfig, rings: Vec<land::Ring>, width: u16, height: u16) -> Self {
        let layout = Layout::new(width, height);
        let center = (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
        let mut auto = AutoRotate::new(config.rotate_step, config.tilt);
        let spin = Some(auto.start());
        Self {
            viewport: Viewport::fit(layout.globe, CANVAS_WIDTH, CANVAS_HEIGHT),
            scene: GlobeScene::new(
                Orthographic::new(GLOBE_SCALE, center, 90.0),
                DragController::new(config.sensitivity),
                RotationState::new(0.0, config.tilt),
            ),
            art: GlobeArt::new(rings),
            auto,
            spin,
            markers: MarkerLayer::new(
                MarkerLayout::standard(CANVAS_WIDTH, CANVAS_HEIGHT, GLOBE_SCALE),
                &Species::ALL,
            ),
            pager: InfoPager::new(),
            pages: DataPages::new(Dataset::new(config.data_dir.clone())),
            panel: Panel::new(layout.content.width, layout.content.height),
            layout,
            hover: None,
            show_help: false,
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.layout = Layout::new(width, height);
        self.viewport = Viewport::fit(self.layout.globe, CANVAS_WIDTH, CANVAS_HEIGHT);
        self.panel = Panel::new(self.layout.content.width, self.layout.content.height);
        self.hover = None;
        if self.pager.is_open() {
            self.pager.refresh(&mut self.pages, &mut self.panel);
        }
    }

    /// Returns true when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode, now: Instant) -> bool {
        self.hover = None;
        if self.show_help {
            match code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc if !self.pager.is_open() && self.markers.expanded().is_none() => {
                return true;
            }
            KeyCode::Esc | KeyCode::Char('x') => self.close(now),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char(' ') => self.toggle_spin(),
            KeyCode::Left | KeyCode::Char('h') => {
                if self.pager.is_open() {
                    self.pager.back(&mut self.pages, &mut self.panel);
                } else {
                    self.scene.enqueue(RotationCommand::Nudge(-NUDGE));
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.pager.is_open() {
                    self.pager.next(&mut self.pages, &mut self.panel);
                } else {
                    self.scene.enqueue(RotationCommand::Nudge(NUDGE));
                }
            }
            KeyCode::Char(c) => {
                if let Some(species) = Species::from_digit(c) {
                    self.markers.click(species, now);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (col, row) = (mouse.column, mouse.row);
        self.hover = None;
        match mouse.kind {
            MouseEventKind::Moved => {
                let content = self.layout.content;
                if self.pager.is_open() && content.contains(col, row) {
                    self.hover = self
                        .pages
                        .hover(col - content.x, row - content.y)
                        .map(|text| (col, row, text));
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.pager.is_open() && self.layout.panel.contains(col, row) {
                    match self.layout.control_at(col, row) {
                        Some(Control::Back) => {
                            self.pager.back(&mut self.pages, &mut self.panel);
                        }
                        Some(Control::Next) => {
                            self.pager.next(&mut self.pages, &mut self.panel);
                        }
                        Some(Control::Close) => self.close(now),
                        None => {}
                    }
                    return;
                }
                let p = self.viewport.cell_to_canvas(col, row);
                match self.markers.hit(p) {
                    Some(species) => {
                        self.markers.click(species, now);
                    }
                    None => self.scene.pointer_down(p.0, p.1),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let p = self.viewport.cell_to_canvas(col, row);
                self.scene.pointer_move(p.0, p.1);
            }
            MouseEventKind::Up(MouseButton::Left) => self.scene.pointer_up(),
            _ => {}
        }
    }

    fn close(&mut self, now: Instant) {
        self.pager.close();
        self.markers.close(now);
    }

    fn toggle_spin(&mut self) {
        match self.spin.take() {
            Some(handle) => handle.stop(),
            None => self.spin = Some(self.auto.start()),
        }
    }

    fn frame(&mut self, now: Instant) {
        if let Some(tick) = self.auto.tick() {
            self.scene.enqueue(tick);
        }
        self.scene.apply_frame();

        for event in self.markers.update(now) {
            match event {
                MarkerEvent::Opened(species) => {
                    if !self.pager.open(species, &mut self.pages, &mut self.panel) {
                        self.markers.close(now);
                    }
                }
            }
        }
    }

    fn draw(&self, term: &mut Terminal) {
        term.clear();

        let area = self.layout.globe;
        let mut canvas = BrailleCanvas::new(area.width, area.height);
        self.art.draw(&mut canvas, &self.viewport, self.scene.projection());
        canvas.blit(term, area.x, area.y, globe::layer_color);

        // Expanded marker on top
        let mut order: Vec<&Marker> = self.markers.markers().iter().collect();
        order.sort_by_key(|m| m.expanded);
        for marker in order {
            self.draw_marker(term, marker);
        }

        if self.pager.is_open() {
            self.draw_panel(term);
        }
        if let Some((col, row, text)) = &self.hover {
            draw_readout(term, *col, *row, text);
        }
        self.draw_status(term);

        if self.show_help {
            let (w, h) = term.size();
            render_help_overlay(term, w, h, HELP_TEXT);
        }
    }

    fn draw_marker(&self, term: &mut Terminal, marker: &Marker) {
        let r = marker.rect();
        let (x0, y0) = self.viewport.to_cell((r.x, r.y));
        let (x1, y1) = self.viewport.to_cell((r.x + r.size, r.y + r.size));
        let x1 = x1.max(x0 + 2);
        let y1 = y1.max(y0 + 2);
        let species = marker.species;
        draw_frame(term, x0, y0, x1, y1, species.accent(), marker.expanded);

        let inner = (x1 - x0 - 1) as usize;
        let tag = format!("{} {}", species.index() + 1, species.tag());
        let mid = (y0 + y1) / 2;
        put_centered(term, x0 + 1, mid, inner, &tag, species.accent(), true);

        let label = species.label();
        let label_w = label.chars().count();
        if marker.expanded {
            if y1 - y0 > 3 && label_w <= inner {
                put_centered(term, x0 + 1, mid + 1, inner, label, Color::Grey, false);
            }
        } else {
            let x = (x0 + x1 + 1) / 2 - label_w as i32 / 2;
            term.set_str(x, label_row(marker.angle, y0, y1), label, Some(Color::Grey), false);
        }
    }

    fn draw_panel(&self, term: &mut Terminal) {
        let p = self.layout.panel;
        if p.width < 3 || p.height < 3 {
            return;
        }
        draw_frame(
            term,
            p.x as i32,
            p.y as i32,
            (p.x + p.width - 1) as i32,
            (p.y + p.height - 1) as i32,
            FRAME,
            false,
        );
        term.blit(self.layout.content.x as i32, self.layout.content.y as i32, self.panel.rows());

        let controls = [
            (self.layout.back, "[<]", self.pager.can_back()),
            (self.layout.next, "[>]", self.pager.can_next()),
            (self.layout.close, "[x]", true),
        ];
        for (area, label, enabled) in controls {
            let color = if enabled { CONTROL_ON } else { CONTROL_OFF };
            term.set_str(area.x as i32, area.y as i32, label, Some(color), enabled);
        }
    }

    fn draw_status(&self, term: &mut Terminal) {
        let row = self.layout.status_row as i32;
        term.set_str(
            1,
            row,
            "drag: rotate  1-5: species  space: spin  ?: help  q: quit",
            Some(Color::DarkGrey),
            false,
        );
        let rotation = self.scene.rotation();
        let mut info = format!("λ {:.1}°  φ {:.1}°", rotation.longitude, rotation.latitude);
        if self.spin.is_none() {
            info.push_str("  paused");
        }
        let x = self.layout.globe.width as i32 - info.chars().count() as i32 - 1;
        term.set_str(x, row, &info, Some(Color::DarkGrey), false);
    }
}

/// Row for a resting marker's label: the side of the box facing away from
/// the globe.
fn label_row(angle: f64, y0: i32, y1: i32) -> i32 {
    if angle.sin() >= 0.0 {
        y1 + 1
    } else {
        y0 - 1
    }
}

/// Page readout beside the pointer, kept on screen
fn draw_readout(term: &mut Terminal, col: u16, row: u16, text: &str) {
    let (width, _) = term.size();
    let padded = format!(" {} ", text);
    let w = padded.chars().count() as i32;
    let x = (col as i32 + 2).min(width as i32 - w).max(0);
    let y = if row > 0 { row as i32 - 1 } else { row as i32 + 1 };
    term.set_str(x, y, &padded, Some(READOUT), true);
}

/// Box outline from `(x0, y0)` to `(x1, y1)` inclusive, interior blanked.
fn draw_frame(term: &mut Terminal, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, bold: bool) {
    let fg = Some(color);
    for y in y0 + 1..y1 {
        for x in x0 + 1..x1 {
            term.set(x, y, ' ', None, false);
        }
        term.set(x0, y, '│', fg, bold);
        term.set(x1, y, '│', fg, bold);
    }
    for x in x0 + 1..x1 {
        term.set(x, y0, '─', fg, bold);
        term.set(x, y1, '─', fg, bold);
    }
    term.set(x0, y0, '┌', fg, bold);
    term.set(x1, y0, '┐', fg, bold);
    term.set(x0, y1, '└', fg, bold);
    term.set(x1, y1, '┘', fg, bold);
}

fn put_centered(
    term: &mut Terminal,
    x: i32,
    y: i32,
    width: usize,
    text: &str,
    color: Color,
    bold: bool,
) {
    let text: String = text.chars().take(width).collect();
    let pad = (width - text.chars().count()) / 2;
    term.set_str(x + pad as i32, y, &text, Some(color), bold);
}

/// Run the interactive globe until the user quits.
pub fn run(config: &GlobeConfig) -> io::Result<()> {
    let rings = land::load(config.land_file.as_deref(), config.land_url.as_deref());

    let mut term = Terminal::new(true)?;
    term.clear_screen()?;
    let _mouse_guard = MouseCaptureGuard::enable()?;

    let (mut prev_w, mut prev_h) = term.size();
    let mut app = App::new(config, rings, prev_w, prev_h);
    log::info!(
        "globe view started: {}x{} cells, {} land rings, data from {}",
        prev_w,
        prev_h,
        app.art.land_rings(),
        config.data_dir.display()
    );

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            app.resize(width, height);
            prev_w = width;
            prev_h = height;
        }

        let now = Instant::now();
        while let Some(event) = term.check_event()? {
            let quit = match event {
                Event::Key(key)
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    true
                }
                Event::Key(key) => app.handle_key(key.code, now),
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse, now);
                    false
                }
                _ => false,
            };
            if quit {
                log::info!("globe view closed");
                return Ok(());
            }
        }

        app.frame(now);
        app.draw(&mut term);
        term.present()?;
        term.sleep(config.frame_time);
    }
}
