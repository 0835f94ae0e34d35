//! Orthographic globe: projection, rotation input, and braille drawing

pub mod autorotate;
pub mod drag;
pub mod graticule;
pub mod land;
pub mod projection;
pub mod scene;

use crate::render::{BrailleCanvas, Viewport};
use crossterm::style::Color;
use projection::Orthographic;

/// Canvas the globe and markers are laid out on
pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 800.0;
pub const GLOBE_SCALE: f64 = 250.0;

/// Dot layers, weakest first
pub const LAYER_GRATICULE: u8 = 1;
pub const LAYER_OUTLINE: u8 = 2;
pub const LAYER_LAND: u8 = 3;

/// Static geometry drawn every frame under the current rotation.
pub struct GlobeArt {
    graticule: Vec<Vec<(f64, f64)>>,
    land: Vec<land::Ring>,
}

impl GlobeArt {
    pub fn new(land: Vec<land::Ring>) -> Self {
        Self { graticule: graticule::graticule(), land }
    }

    pub fn land_rings(&self) -> usize {
        self.land.len()
    }

    /// Plot sphere outline, grid and land into `canvas`, which covers the
    /// viewport's area.
    pub fn draw(&self, canvas: &mut BrailleCanvas, viewport: &Viewport, projection: &Orthographic) {
        let center = viewport.to_dot(projection.translate());
        canvas.circle(center, viewport.dots(projection.scale()), LAYER_OUTLINE);

        for line in &self.graticule {
            plot_runs(canvas, viewport, projection.project_path(line, 1), LAYER_GRATICULE);
        }
        for ring in &self.land {
            plot_runs(canvas, viewport, projection.project_path(ring, 2), LAYER_LAND);
        }
    }
}

fn plot_runs(
    canvas: &mut BrailleCanvas,
    viewport: &Viewport,
    runs: Vec<Vec<(f64, f64)>>,
    layer: u8,
) {
    for run in runs {
        let dots: Vec<(i32, i32)> = run.iter().map(|&p| viewport.to_dot(p)).collect();
        canvas.polyline(&dots, layer);
    }
}

/// Globe palette keyed by layer
pub fn layer_color(layer: u8) -> (Color, bool) {
    match layer {
        LAYER_LAND => (Color::Green, false),
        LAYER_OUTLINE => (Color::Cyan, false),
        _ => (Color::DarkGrey, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Area;

    #[test]
    fn outline_and_land_show_up_on_the_canvas() {
        let area = Area::new(0, 0, 80, 40);
        let viewport = Viewport::fit(area, CANVAS_WIDTH, CANVAS_HEIGHT);
        let projection = Orthographic::new(GLOBE_SCALE, (400.0, 400.0), 90.0);
        let art = GlobeArt::new(land::builtin_outline());
        let mut canvas = BrailleCanvas::new(area.width, area.height);
        art.draw(&mut canvas, &viewport, &projection);

        // Rightmost point of the sphere outline
        let (x, y) = viewport.to_dot((650.0, 400.0));
        let near = (-1..=1)
            .any(|dx| (-1..=1).any(|dy| canvas.get(x + dx, y + dy) == LAYER_OUTLINE));
        assert!(near);

        let cells = canvas.to_cells(layer_color);
        let green = cells.iter().flatten().filter(|c| c.fg == Some(Color::Green)).count();
        assert!(green > 0, "some land should face the viewer");
    }

    #[test]
    fn nothing_is_drawn_outside_the_sphere() {
        let area = Area::new(0, 0, 40, 20);
        let viewport = Viewport::fit(area, CANVAS_WIDTH, CANVAS_HEIGHT);
        let projection = Orthographic::new(GLOBE_SCALE, (400.0, 400.0), 90.0);
        let art = GlobeArt::new(land::builtin_outline());
        let mut canvas = BrailleCanvas::new(area.width, area.height);
        art.draw(&mut canvas, &viewport, &projection);

        // Canvas corner is far outside the globe radius
        let (x, y) = viewport.to_dot((20.0, 20.0));
        assert_eq!(canvas.get(x, y), 0);
    }
}
