//! Species markers arranged on a ring around the globe

use crate::species::Species;
use std::time::{Duration, Instant};

/// Marker expand/restore animation length
pub const ANIMATION: Duration = Duration::from_millis(1000);

/// Axis-aligned box in canvas units, `(x, y)` being the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Rect {
    /// Square of `size` centered on `(cx, cy)`
    pub fn centered(cx: f64, cy: f64, size: f64) -> Self {
        Self { x: cx - size / 2.0, y: cy - size / 2.0, size }
    }

    #[cfg(test)]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn contains(&self, p: (f64, f64)) -> bool {
        p.0 >= self.x && p.0 < self.x + self.size && p.1 >= self.y && p.1 < self.y + self.size
    }

    fn lerp(&self, to: &Rect, t: f64) -> Rect {
        Rect {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            size: self.size + (to.size - self.size) * t,
        }
    }
}

/// Cubic ease-in-out
fn ease_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: Rect,
    to: Rect,
    started: Instant,
    duration: Duration,
}

impl Tween {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        now.saturating_duration_since(self.started).as_secs_f64() / self.duration.as_secs_f64()
    }

    fn sample(&self, now: Instant) -> Rect {
        self.from.lerp(&self.to, ease_cubic(self.progress(now)))
    }

    fn finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Geometry of the marker ring, in canvas units.
#[derive(Clone, Copy, Debug)]
pub struct MarkerLayout {
    pub center: (f64, f64),
    pub globe_radius: f64,
    pub spacing: f64,
    pub size: f64,
    /// Size markers shrink back to on close
    pub rest_size: f64,
    /// Where a selected marker grows to
    pub expanded: Rect,
}

impl MarkerLayout {
    /// Layout for an `width × height` canvas with the globe scaled to `globe_radius`.
    pub fn standard(width: f64, height: f64, globe_radius: f64) -> Self {
        const SIZE: f64 = 135.0;
        Self {
            center: (width / 2.0, height / 2.0),
            globe_radius,
            spacing: 100.0,
            size: SIZE,
            rest_size: SIZE,
            expanded: Rect { x: 50.0, y: height / 2.0 - SIZE, size: SIZE * 2.0 },
        }
    }

    /// Resting box of marker `i` of `n`
    pub fn slot(&self, i: usize, n: usize) -> (f64, Rect) {
        let angle = i as f64 * std::f64::consts::TAU / n.max(1) as f64;
        let r = self.globe_radius + self.spacing;
        let cx = self.center.0 + r * angle.cos();
        let cy = self.center.1 + r * angle.sin();
        (angle, Rect::centered(cx, cy, self.size))
    }
}

#[derive(Clone, Debug)]
pub struct Marker {
    pub species: Species,
    pub angle: f64,
    pub original: Rect,
    pub expanded: bool,
    current: Rect,
    tween: Option<Tween>,
    open_on_finish: bool,
}

impl Marker {
    pub fn rect(&self) -> Rect {
        self.current
    }

    fn animate_to(&mut self, to: Rect, now: Instant) {
        self.tween = Some(Tween { from: self.current, to, started: now, duration: ANIMATION });
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarkerEvent {
    /// The expand animation finished; the panel should open for this species.
    Opened(Species),
}

pub struct MarkerLayer {
    layout: MarkerLayout,
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn new(layout: MarkerLayout, all: &[Species]) -> Self {
        let markers = all
            .iter()
            .enumerate()
            .map(|(i, &species)| {
                let (angle, original) = layout.slot(i, all.len());
                Marker {
                    species,
                    angle,
                    original,
                    expanded: false,
                    current: original,
                    tween: None,
                    open_on_finish: false,
                }
            })
            .collect();
        Self { layout, markers }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[cfg(test)]
    pub fn get(&self, species: Species) -> Option<&Marker> {
        self.markers.iter().find(|m| m.species == species)
    }

    /// Species whose marker is expanded or expanding
    pub fn expanded(&self) -> Option<Species> {
        self.markers.iter().find(|m| m.expanded).map(|m| m.species)
    }

    /// Topmost marker under a canvas point
    pub fn hit(&self, p: (f64, f64)) -> Option<Species> {
        // Expanded markers are drawn last, so they win
        self.markers
            .iter()
            .filter(|m| m.rect().contains(p))
            .max_by_key(|m| m.expanded)
            .map(|m| m.species)
    }

    /// Grow the marker into the expanded slot. Any other expanded marker
    /// goes back to its resting box.
    pub fn click(&mut self, species: Species, now: Instant) -> bool {
        if !self.markers.iter().any(|m| m.species == species) {
            log::warn!("no marker for {}", species);
            return false;
        }
        let expanded_rect = self.layout.expanded;
        for marker in &mut self.markers {
            if marker.species == species {
                marker.expanded = true;
                marker.open_on_finish = true;
                marker.animate_to(expanded_rect, now);
            } else if marker.expanded {
                let rest = Rect { size: self.layout.rest_size, ..marker.original };
                marker.expanded = false;
                marker.open_on_finish = false;
                marker.animate_to(rest, now);
            }
        }
        true
    }

    /// Return every marker to its original box at the default size.
    pub fn close(&mut self, now: Instant) {
        let size = self.layout.rest_size;
        for marker in &mut self.markers {
            marker.expanded = false;
            marker.open_on_finish = false;
            let rest = Rect { size, ..marker.original };
            marker.animate_to(rest, now);
        }
    }

    /// Advance animations; reports markers whose expansion just completed.
    pub fn update(&mut self, now: Instant) -> Vec<MarkerEvent> {
        let mut events = Vec::new();
        for marker in &mut self.markers {
            let Some(tween) = marker.tween else {
                continue;
            };
            marker.current = tween.sample(now);
            if tween.finished(now) {
                marker.current = tween.to;
                marker.tween = None;
                if std::mem::take(&mut marker.open_on_finish) {
                    events.push(MarkerEvent::Opened(marker.species));
                }
            }
        }
        events
    }
}
