//! Page renderers backed by the data directory

use crate::data::{CountryPoint, Dataset, Threat, YearPoint};
use crate::globe::land;
use crate::pager::{Page, PageRenderer, Panel};
use crate::render::BrailleCanvas;
use crate::species::Species;
use crossterm::style::Color;

const MUTED: Color = Color::DarkGrey;
const TEXT: Color = Color::Grey;

/// Slice colors, cycled in legend order
const CATEGORY_COLORS: [Color; 6] = [
    Color::Blue,
    Color::DarkYellow,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::DarkCyan,
];

fn description(page: Page, species: Species) -> &'static str {
    use Page::*;
    use Species::*;
    match (page, species) {
        (Distribution, Tiger) => {
            "Tigers range across Asia: the forests, grasslands and wetlands of India, Russia, \
             China and parts of Southeast Asia. Their fragmented range is why habitat protection \
             and anti-poaching work matter so much."
        }
        (Distribution, BelugaWhale) => {
            "Belugas live in Arctic and sub-Arctic waters off Canada, Alaska, Greenland, Norway \
             and Russia, favouring shallow coasts and moving to deeper water in winter."
        }
        (Distribution, Panda) => {
            "The giant panda is native to China, living in the bamboo forests of the Sichuan, \
             Shaanxi and Gansu mountains. Its small range makes habitat conservation in China \
             essential."
        }
        (Distribution, SiberianCrane) => {
            "Siberian cranes breed in the Arctic tundra of Siberia. The eastern population \
             winters at Poyang Lake in China; the western population historically wintered in \
             India and Iran."
        }
        (Distribution, ArcticFox) => {
            "Arctic foxes span the tundra of North America, Greenland, Russia and Scandinavia, a \
             wide circumpolar range shaped by their adaptation to extreme cold."
        }
        (Threats, Tiger) => {
            "Habitat loss and poaching together account for nine tenths of the pressure on \
             tigers; climate change and conflict with people make up the rest."
        }
        (Threats, BelugaWhale) => {
            "Climate change and pollution are the largest threats to belugas, followed by habitat \
             loss and other factors."
        }
        (Threats, Panda) => {
            "Habitat loss dominates the threats to pandas. Poaching, climate change and conflict \
             with people are minor by comparison."
        }
        (Threats, SiberianCrane) => {
            "Wetland destruction and agricultural expansion make habitat loss the overwhelming \
             threat to the Siberian crane."
        }
        (Threats, ArcticFox) => {
            "Climate change is the main threat to the Arctic fox, shrinking prey and letting red \
             foxes move north; habitat loss follows."
        }
        (Trend, Tiger) => {
            "Tiger numbers fell sharply from 1980 to a low around 2000, then recovered under \
             conservation programmes."
        }
        (Trend, BelugaWhale) => {
            "Beluga numbers have declined steadily since 1980 as climate, pollution and habitat \
             pressures grow."
        }
        (Trend, Panda) => {
            "The panda population has roughly doubled since 1980, helped by habitat protection \
             and captive breeding."
        }
        (Trend, SiberianCrane) => {
            "Siberian crane counts have risen slowly since 1980, though the species remains \
             critically endangered."
        }
        (Trend, ArcticFox) => {
            "Arctic fox numbers have dropped steeply since 1980 under warming and competition \
             from red foxes."
        }
    }
}

/// A panel cell with a pointer readout
#[derive(Clone, Debug, PartialEq)]
struct HoverTarget {
    x: i32,
    y: i32,
    text: String,
}

/// Renders pages from files in a [`Dataset`]. Every call reads the files
/// again; a failed read leaves a "no data" note instead of a chart.
pub struct DataPages {
    data: Dataset,
    outline: Vec<land::Ring>,
    targets: Vec<HoverTarget>,
}

impl DataPages {
    pub fn new(data: Dataset) -> Self {
        Self { data, outline: land::builtin_outline(), targets: Vec::new() }
    }

    fn header(&self, page: Page, species: Species, panel: &mut Panel) -> i32 {
        let (width, _) = panel.size();
        let heading = format!("{} · {}", species.label(), page.title());
        panel.set_str(1, 0, &heading, Some(species.accent()), true);
        let page_no = format!("{}/{}", page.index() + 1, Page::ALL.len());
        panel.set_str(width as i32 - page_no.len() as i32 - 1, 0, &page_no, Some(MUTED), false);
        let text_w = width.saturating_sub(2) as usize;
        panel.wrap(1, 2, text_w, description(page, species), Some(TEXT)) + 1
    }

    fn no_data(panel: &mut Panel, y: i32, what: &str) {
        panel.set_str(1, y, &format!("No {} data available.", what), Some(MUTED), false);
    }

    fn distribution(&mut self, species: Species, panel: &mut Panel, top: i32) {
        let countries = match self.data.distribution(species) {
            Ok(countries) => countries,
            Err(e) => {
                log::warn!("distribution for {}: {}", species, e);
                Vec::new()
            }
        };
        let (width, height) = panel.size();
        let list = country_list(&countries);
        let list_rows = (list.chars().count() / width.saturating_sub(2).max(1) as usize + 1) as i32;
        let map_rows = (height as i32 - top - list_rows - 1).max(0) as u16;
        let map_cols = width.saturating_sub(2).min(map_rows * 4);

        if map_rows >= 4 && map_cols >= 8 {
            let mut canvas = BrailleCanvas::new(map_cols, map_rows);
            let (dots_w, dots_h) = (map_cols as f64 * 2.0, map_rows as f64 * 4.0);
            let to_dot = |lon: f64, lat: f64| {
                (
                    ((lon + 180.0) / 360.0 * (dots_w - 1.0)).round() as i32,
                    ((90.0 - lat) / 180.0 * (dots_h - 1.0)).round() as i32,
                )
            };
            for ring in &self.outline {
                let points: Vec<(i32, i32)> =
                    ring.iter().map(|&(lon, lat)| to_dot(lon, lat)).collect();
                canvas.polyline(&points, 1);
            }
            for c in countries.iter().filter(|c| c.lon.is_finite() && c.lat.is_finite()) {
                let (x, y) = to_dot(c.lon, c.lat);
                for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
                    canvas.plot(x + dx, y + dy, 2);
                }
            }
            let x0 = (width - map_cols) as i32 / 2;
            for c in countries.iter().filter(|c| c.lon.is_finite() && c.lat.is_finite()) {
                let (x, y) = to_dot(c.lon, c.lat);
                self.targets.push(HoverTarget {
                    x: x0 + x / 2,
                    y: top + y / 4,
                    text: format!("{} / {}", c.country, species.label()),
                });
            }
            for (dy, row) in canvas
                .to_cells(|layer| if layer >= 2 { (Color::Cyan, true) } else { (MUTED, false) })
                .iter()
                .enumerate()
            {
                for (dx, cell) in row.iter().enumerate() {
                    panel.set(x0 + dx as i32, top + dy as i32, cell.ch, cell.fg, cell.bold);
                }
            }
        }

        let list_top = top + map_rows as i32;
        if countries.is_empty() {
            Self::no_data(panel, list_top, "distribution");
        } else {
            panel.wrap(1, list_top, width.saturating_sub(2) as usize, &list, Some(Color::Cyan));
        }
    }

    fn threats(&self, species: Species, panel: &mut Panel, top: i32) {
        let threats = match self.data.threats(species) {
            Ok(Some(threats)) if !threats.is_empty() => threats,
            Ok(_) => {
                log::warn!("no threat row for {}", species);
                return Self::no_data(panel, top, "threat");
            }
            Err(e) => {
                log::warn!("threats for {}: {}", species, e);
                return Self::no_data(panel, top, "threat");
            }
        };

        let (width, _) = panel.size();
        let label_w = THREAT_LABEL_WIDTH;
        let bar_w = (width as usize).saturating_sub(label_w + 8).max(4);
        for (i, (threat, share)) in threat_shares(&threats).into_iter().enumerate() {
            let y = top + i as i32;
            let color = CATEGORY_COLORS[i % CATEGORY_COLORS.len()];
            panel.set(1, y, '■', Some(color), false);
            panel.set_str(3, y, threat.category, Some(TEXT), false);
            let filled = (share * bar_w as f64).round() as usize;
            let bar: String = "█".repeat(filled.max(1));
            panel.set_str(label_w as i32 + 3, y, &bar, Some(color), false);
            let value = format!("{}%", threat.percent.round() as i64);
            panel.set_str((label_w + bar_w) as i32 + 4, y, &value, Some(Color::White), true);
        }
    }

    fn trend(&mut self, species: Species, panel: &mut Panel, top: i32) {
        let points = match self.data.trend(species) {
            Ok(points) if !points.is_empty() => points,
            Ok(_) => return Self::no_data(panel, top, "population"),
            Err(e) => {
                log::warn!("trend for {}: {}", species, e);
                return Self::no_data(panel, top, "population");
            }
        };

        let (width, height) = panel.size();
        let axis_w = 8u16;
        let chart_w = width.saturating_sub(axis_w + 2);
        let chart_h = (height as i32 - top - 3).max(0) as u16;
        if chart_w < 8 || chart_h < 3 {
            log::warn!("panel too small for the trend chart");
            return;
        }

        let chart = TrendChart::new(&points, chart_w, chart_h);
        let cells = chart.canvas.to_cells(|layer| match layer {
            4 => (Color::Red, true),
            3 => (Color::Green, true),
            2 => (Color::Blue, false),
            _ => (MUTED, false),
        });
        let x0 = axis_w as i32 + 1;
        for (point, &(x, y)) in points.iter().zip(&chart.dots) {
            self.targets.push(HoverTarget {
                x: x0 + x / 2,
                y: top + y / 4,
                text: format!("{}: {} ({})", point.year, compact(point.population), point.status),
            });
        }
        for (dy, row) in cells.iter().enumerate() {
            for (dx, cell) in row.iter().enumerate() {
                panel.set(x0 + dx as i32, top + dy as i32, cell.ch, cell.fg, cell.bold);
            }
        }

        panel.set_str(1, top, &compact(chart.y_max), Some(MUTED), false);
        panel.set_str(1, top + chart_h as i32 - 1, "0", Some(MUTED), false);
        let bottom = top + chart_h as i32;
        let (first, last) = chart.years;
        panel.set_str(x0, bottom, &first.to_string(), Some(MUTED), false);
        let last_label = last.to_string();
        let last_x = x0 + chart_w as i32 - last_label.len() as i32;
        panel.set_str(last_x, bottom, &last_label, Some(MUTED), false);

        if let Some(latest) = points.last() {
            let population = compact(latest.population);
            let summary = format!("{}: {} ({})", latest.year, population, latest.status);
            panel.set_str(1, bottom + 1, &summary, Some(Color::White), true);
        }
        panel.set_str(1, bottom + 2, "●", Some(Color::Red), false);
        panel.set_str(3, bottom + 2, "Endangered", Some(TEXT), false);
        panel.set_str(15, bottom + 2, "●", Some(Color::Green), false);
        panel.set_str(17, bottom + 2, "Other status", Some(TEXT), false);
    }
}

impl PageRenderer for DataPages {
    fn render(&mut self, page: Page, species: Species, panel: &mut Panel) {
        self.targets.clear();
        let top = self.header(page, species, panel);
        match page {
            Page::Distribution => self.distribution(species, panel, top),
            Page::Threats => self.threats(species, panel, top),
            Page::Trend => self.trend(species, panel, top),
        }
    }

    /// Nearest target on the same row, at most one column away
    fn hover(&self, x: u16, y: u16) -> Option<String> {
        let (x, y) = (x as i32, y as i32);
        self.targets
            .iter()
            .filter(|t| t.y == y && (t.x - x).abs() <= 1)
            .min_by_key(|t| (t.x - x).abs())
            .map(|t| t.text.clone())
    }
}

const THREAT_LABEL_WIDTH: usize = 24;

/// Each threat with its fraction of the total
fn threat_shares(threats: &[Threat]) -> Vec<(&Threat, f64)> {
    let total: f64 = threats.iter().map(|t| t.percent).sum();
    threats
        .iter()
        .map(|t| (t, if total > 0.0 { t.percent / total } else { 0.0 }))
        .collect()
}

fn country_list(countries: &[CountryPoint]) -> String {
    let names: Vec<&str> = countries.iter().map(|c| c.country.as_str()).collect();
    format!("Found in: {}", names.join(", "))
}

/// 1234 -> "1,234"; 182000 -> "182k"
fn compact(value: f64) -> String {
    let v = value.round() as i64;
    if v.abs() >= 100_000 {
        format!("{}k", v / 1000)
    } else if v.abs() >= 1000 {
        format!("{},{:03}", v / 1000, (v % 1000).abs())
    } else {
        v.to_string()
    }
}

/// Population line with per-year status dots, y from 0 to 110% of the peak.
struct TrendChart {
    canvas: BrailleCanvas,
    /// Dot position of each point
    dots: Vec<(i32, i32)>,
    y_max: f64,
    years: (i32, i32),
}

impl TrendChart {
    fn new(points: &[YearPoint], cols: u16, rows: u16) -> Self {
        let mut canvas = BrailleCanvas::new(cols, rows);
        let (w, h) = (cols as i32 * 2, rows as i32 * 4);
        let first = points.first().map_or(0, |p| p.year);
        let last = points.last().map_or(0, |p| p.year);
        let peak = points.iter().map(|p| p.population).fold(0.0, f64::max);
        let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };
        let span = (last - first).max(1) as f64;

        let to_dot = |p: &YearPoint| {
            let x = (p.year - first) as f64 / span * (w - 1) as f64;
            let y = (1.0 - p.population / y_max) * (h - 1) as f64;
            (x.round() as i32, y.round() as i32)
        };

        canvas.line((0, h - 1), (w - 1, h - 1), 1);
        let dots: Vec<(i32, i32)> = points.iter().map(to_dot).collect();
        canvas.polyline(&dots, 2);
        for (point, &(x, y)) in points.iter().zip(&dots) {
            let layer = if point.is_endangered() { 4 } else { 3 };
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                canvas.plot(x + dx, y + dy, layer);
            }
        }

        Self { canvas, dots, y_max, years: (first, last) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    fn render(page: Page, species: Species, dir: PathBuf) -> Panel {
        let mut pages = DataPages::new(Dataset::new(dir));
        let mut panel = Panel::new(60, 24);
        pages.render(page, species, &mut panel);
        panel
    }

    #[test]
    fn every_page_has_a_heading() {
        for page in Page::ALL {
            let panel = render(page, Species::Panda, data_dir());
            assert!(panel.line(0).contains(&format!("Panda · {}", page.title())));
            assert!(panel.line(0).ends_with(&format!("{}/3", page.index() + 1)));
        }
    }

    #[test]
    fn threats_page_lists_nonzero_categories() {
        let text = render(Page::Threats, Species::Tiger, data_dir()).text();
        assert!(text.contains("Habitat Loss"));
        assert!(text.contains("50%"));
        assert!(text.contains("Poaching"));
        assert!(!text.contains("Pollution"));
    }

    #[test]
    fn distribution_page_names_countries() {
        let text = render(Page::Distribution, Species::Panda, data_dir()).text();
        assert!(text.contains("Found in: China"));
    }

    #[test]
    fn trend_page_summarises_latest_year() {
        let text = render(Page::Trend, Species::Panda, data_dir()).text();
        assert!(text.contains("1980"));
        assert!(text.contains("2020:"));
    }

    #[test]
    fn missing_data_renders_a_note() {
        for page in Page::ALL {
            let text = render(page, Species::Tiger, PathBuf::from("/nonexistent")).text();
            assert!(text.contains("No ") && text.contains("data available."), "{:?}", page);
        }
    }

    #[test]
    fn hovering_a_country_dot_names_it() {
        let mut pages = DataPages::new(Dataset::new(data_dir()));
        let mut panel = Panel::new(60, 24);
        pages.render(Page::Distribution, Species::Panda, &mut panel);
        let target = pages.targets.first().cloned().unwrap();
        assert_eq!(target.text, "China / Panda");
        assert_eq!(
            pages.hover(target.x as u16 + 1, target.y as u16).as_deref(),
            Some("China / Panda")
        );
        assert_eq!(pages.hover(0, 0), None);
    }

    #[test]
    fn hovering_a_trend_point_gives_year_and_population() {
        let mut pages = DataPages::new(Dataset::new(data_dir()));
        let mut panel = Panel::new(60, 24);
        pages.render(Page::Trend, Species::Panda, &mut panel);
        let first = pages.targets.first().cloned().unwrap();
        let readout = pages.hover(first.x as u16, first.y as u16).unwrap();
        assert!(readout.starts_with("1980: "), "{}", readout);

        // A new page drops the old targets
        pages.render(Page::Threats, Species::Panda, &mut panel);
        assert_eq!(pages.hover(first.x as u16, first.y as u16), None);
    }

    #[test]
    fn shares_sum_to_one() {
        let threats = vec![
            Threat { category: "Habitat Loss", percent: 30.0 },
            Threat { category: "Climate Change", percent: 50.0 },
            Threat { category: "Other", percent: 20.0 },
        ];
        let total: f64 = threat_shares(&threats).iter().map(|(_, s)| s).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn compact_numbers() {
        assert_eq!(compact(950.0), "950");
        assert_eq!(compact(3900.0), "3,900");
        assert_eq!(compact(1005.0), "1,005");
        assert_eq!(compact(182_000.0), "182k");
    }
}
