//! Landmass outlines: TopoJSON decoding, fetching, and a built-in fallback

use crate::error::DataError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LAND_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/land-110m.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// A closed ring of `(lon, lat)` degrees.
pub type Ring = Vec<(f64, f64)>;

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    arcs: Vec<Vec<Vec<f64>>>,
    objects: HashMap<String, TopoObject>,
}

#[derive(Debug, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoObject {
    GeometryCollection { geometries: Vec<TopoObject> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    #[serde(other)]
    Other,
}

/// Decode the named object of a TopoJSON topology into outline rings.
pub fn decode_topology(json: &str, object: &str) -> Result<Vec<Ring>, DataError> {
    let topology: Topology =
        serde_json::from_str(json).map_err(|e| DataError::json("topology", e))?;
    let arcs = decode_arcs(&topology);
    let root = topology
        .objects
        .get(object)
        .ok_or_else(|| DataError::MissingObject(object.to_string()))?;

    let mut rings = Vec::new();
    collect_rings(root, &arcs, &mut rings)?;
    Ok(rings)
}

/// Absolute coordinates for every arc, undoing quantization and delta encoding.
fn decode_arcs(topology: &Topology) -> Vec<Ring> {
    topology
        .arcs
        .iter()
        .map(|arc| {
            let (mut x, mut y) = (0.0, 0.0);
            arc.iter()
                .filter(|p| p.len() >= 2)
                .map(|p| match &topology.transform {
                    Some(t) => {
                        x += p[0];
                        y += p[1];
                        (x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1])
                    }
                    None => (p[0], p[1]),
                })
                .collect()
        })
        .collect()
}

fn collect_rings(object: &TopoObject, arcs: &[Ring], out: &mut Vec<Ring>) -> Result<(), DataError> {
    match object {
        TopoObject::GeometryCollection { geometries } => {
            for geometry in geometries {
                collect_rings(geometry, arcs, out)?;
            }
        }
        TopoObject::Polygon { arcs: rings } | TopoObject::MultiLineString { arcs: rings } => {
            for ring in rings {
                out.push(stitch(ring, arcs)?);
            }
        }
        TopoObject::MultiPolygon { arcs: polygons } => {
            for ring in polygons.iter().flatten() {
                out.push(stitch(ring, arcs)?);
            }
        }
        TopoObject::LineString { arcs: line } => out.push(stitch(line, arcs)?),
        TopoObject::Other => {}
    }
    Ok(())
}

/// Join arcs into one line. A negative index `i` means arc `!i` reversed;
/// each joined arc drops its first point, which repeats the previous end.
fn stitch(indices: &[i64], arcs: &[Ring]) -> Result<Ring, DataError> {
    let mut ring = Ring::new();
    for &index in indices {
        let (arc_index, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(DataError::BadArc { index, count: arcs.len() })?;

        let points: Box<dyn Iterator<Item = &(f64, f64)>> = if reversed {
            Box::new(arc.iter().rev())
        } else {
            Box::new(arc.iter())
        };
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.skip(skip).copied());
    }
    Ok(ring)
}

/// Load the `land` object from a local TopoJSON file.
pub fn load_file(path: &Path) -> Result<Vec<Ring>, DataError> {
    let json = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    decode_topology(&json, "land")
}

/// Fetch and decode the `land` object over HTTP.
pub fn fetch(url: &str) -> Result<Vec<Ring>, DataError> {
    let response = ureq::get(url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .map_err(|e| DataError::Fetch { url: url.to_string(), reason: e.to_string() })?;
    let body = response
        .into_string()
        .map_err(|e| DataError::Fetch { url: url.to_string(), reason: e.to_string() })?;
    decode_topology(&body, "land")
}

/// Land outlines from the first source that works: file, then URL, then
/// the built-in coarse outline. Failures are logged, never returned.
pub fn load(file: Option<&Path>, url: Option<&str>) -> Vec<Ring> {
    if let Some(path) = file {
        match load_file(path) {
            Ok(rings) if !rings.is_empty() => {
                log::info!("loaded {} land rings from {}", rings.len(), path.display());
                return rings;
            }
            Ok(_) => log::warn!("{} has no land rings", path.display()),
            Err(e) => log::warn!("land file unavailable: {}", e),
        }
    }
    if let Some(url) = url {
        match fetch(url) {
            Ok(rings) if !rings.is_empty() => {
                log::info!("fetched {} land rings from {}", rings.len(), url);
                return rings;
            }
            Ok(_) => log::warn!("{} has no land rings", url),
            Err(e) => log::warn!("land fetch failed: {}", e),
        }
    }
    log::info!("using built-in land outline");
    builtin_outline()
}

/// Coarse continent outlines, `(lon, lat)` degrees.
pub fn builtin_outline() -> Vec<Ring> {
    BUILTIN_CONTINENTS
        .iter()
        .map(|points| points.iter().map(|&(lat, lon)| (lon as f64, lat as f64)).collect())
        .collect()
}

// (lat, lon) pairs as surveyed; converted on use.
const BUILTIN_CONTINENTS: &[&[(f32, f32)]] = &[
    // North America
    &[
        (69.5, -90.5), (67.1, -81.4), (58.9, -94.7), (51.2, -79.9), (62.6, -77.4),
        (58.2, -67.6), (60.3, -64.6), (53.3, -55.8), (46.8, -71.1), (49.2, -65.1),
        (45.9, -59.8), (39.2, -76.3), (31.4, -81.3), (25.2, -80.4), (30.1, -84.1),
        (27.8, -97.1), (18.8, -95.9), (21.5, -87.1), (15.9, -88.9), (15.3, -83.4),
        (9.0, -82.2), (11.1, -74.9), (7.2, -80.9), (19.3, -105.0), (31.2, -113.1),
        (23.4, -109.4), (24.7, -112.2), (40.3, -124.4), (49.0, -122.8), (58.1, -134.1),
        (61.3, -150.6), (54.4, -164.8), (58.9, -157.0), (61.5, -166.1), (64.8, -160.8),
        (65.7, -168.1), (71.4, -156.6), (67.4, -108.9), (67.3, -96.1), (71.9, -95.2),
        (69.5, -90.5),
    ],
    // South America
    &[
        (11.1, -74.9), (10.7, -61.9), (4.2, -51.3), (-0.1, -50.4), (-7.3, -34.7),
        (-21.9, -40.9), (-24.9, -47.6), (-34.4, -53.8), (-33.9, -58.4), (-36.9, -56.8),
        (-41.1, -65.1), (-48.1, -66.0), (-53.8, -71.0), (-52.3, -74.9), (-46.6, -75.6),
        (-42.4, -72.7), (-18.3, -70.4), (-14.6, -76.0), (-4.7, -81.4), (3.8, -77.1),
        (9.0, -79.1), (11.1, -74.9),
    ],
    // Europe
    &[
        (36.0, -5.9), (36.9, -8.9), (43.0, -9.4), (43.4, -1.9), (48.7, -4.6),
        (53.5, 8.1), (57.1, 8.5), (54.0, 10.9), (54.4, 19.7), (59.2, 23.3),
        (60.0, 29.1), (60.7, 21.3), (65.1, 25.4), (65.7, 22.2), (55.4, 12.9),
        (59.5, 10.4), (58.6, 5.7), (62.6, 5.9), (69.8, 19.2), (70.5, 31.3),
        (69.3, 33.8), (66.6, 33.2), (60.0, 40.0), (47.3, 39.1), (44.4, 33.9),
        (46.6, 30.7), (41.1, 28.8), (40.3, 22.6), (36.4, 23.2), (45.6, 13.9),
        (40.2, 18.5), (37.9, 15.7), (44.4, 8.9), (36.0, -5.9),
    ],
    // Africa
    &[
        (31.2, 29.7), (29.9, 32.4), (11.7, 42.7), (10.6, 51.0), (-4.7, 39.2),
        (-14.7, 40.8), (-19.8, 34.8), (-24.1, 35.5), (-32.8, 28.2), (-34.8, 19.6),
        (-18.1, 11.8), (-10.7, 13.7), (3.7, 9.4), (6.3, 4.3), (4.4, -8.0),
        (14.7, -17.6), (27.7, -13.1), (35.8, -5.9), (37.1, 10.2), (32.9, 13.2),
        (31.2, 29.7),
    ],
    // Asia
    &[
        (77.0, 107.0), (70.8, 131.3), (69.4, 178.6), (62.3, 179.2), (59.9, 163.5),
        (51.0, 156.8), (56.8, 155.9), (62.6, 164.5), (54.7, 135.1), (52.2, 141.4),
        (39.8, 127.5), (35.1, 129.1), (40.9, 121.6), (39.2, 118.0), (37.5, 122.4),
        (34.9, 119.2), (28.2, 121.7), (19.8, 105.9), (13.4, 109.3), (8.6, 105.2),
        (13.4, 100.1), (1.3, 104.2), (22.8, 91.4), (15.9, 80.3), (8.0, 77.5),
        (21.4, 72.6), (30.3, 48.9), (24.0, 51.8), (26.4, 56.4), (22.3, 59.8),
        (12.6, 43.5), (21.3, 39.1), (29.9, 32.4), (36.7, 36.2), (41.5, 41.6),
        (47.3, 39.1), (60.0, 40.0), (66.6, 33.2), (68.6, 43.5), (68.1, 68.5),
        (73.0, 69.9), (72.8, 74.7), (77.0, 107.0),
    ],
    // Australia
    &[
        (-13.8, 143.6), (-26.1, 153.1), (-37.4, 150.0), (-38.0, 140.6), (-34.4, 138.2),
        (-31.5, 131.3), (-34.2, 115.0), (-21.8, 114.1), (-19.7, 120.9), (-14.2, 125.7),
        (-15.0, 129.6), (-11.1, 132.4), (-11.9, 136.5), (-17.7, 140.2), (-11.0, 142.1),
        (-13.8, 143.6),
    ],
    // Greenland
    &[
        (83.5, -27.1), (81.3, -12.2), (76.6, -21.7), (70.2, -26.4), (65.5, -39.8),
        (60.1, -43.4), (63.6, -51.6), (69.9, -50.9), (75.5, -58.6), (78.0, -73.3),
        (81.8, -62.7), (83.5, -27.1),
    ],
    // Japan
    &[
        (37.1, 141.0), (33.5, 135.8), (33.9, 131.0), (31.4, 130.2), (33.3, 129.4),
        (38.2, 139.4), (41.2, 140.3), (37.1, 141.0),
    ],
    // Great Britain
    &[(58.6, -3.0), (51.3, 1.4), (50.0, -5.2), (54.0, -2.9), (56.8, -6.1), (58.6, -3.0)],
    // Antarctica
    &[
        (-64.2, -58.6), (-73.7, -60.8), (-79.2, -78.0), (-83.2, -58.2), (-78.1, -35.3),
        (-70.9, -6.9), (-65.8, 54.5), (-66.2, 88.0), (-65.3, 135.1), (-71.7, 171.2),
        (-76.9, -158.4), (-73.9, -74.9), (-64.2, -58.6),
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [0.5, 0.25], "translate": [-10, 20] },
        "arcs": [
            [[0, 0], [2, 0], [0, 4]],
            [[2, 4], [-2, -4]]
        ],
        "objects": {
            "land": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "MultiPolygon", "arcs": [[[0, 1]]] },
                    { "type": "Point", "coordinates": [1, 1] }
                ]
            }
        }
    }"#;

    #[test]
    fn decodes_quantized_delta_arcs() {
        let rings = decode_topology(SAMPLE, "land").unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(
            rings[0],
            vec![(-10.0, 20.0), (-9.0, 20.0), (-9.0, 21.0), (-10.0, 20.0)]
        );
    }

    #[test]
    fn reversed_arcs_are_walked_backwards() {
        let json = r#"{
            "type": "Topology",
            "arcs": [[[0, 0], [10, 0]], [[10, 0], [10, 10], [0, 0]]],
            "objects": { "land": { "type": "Polygon", "arcs": [[0, -2]] } }
        }"#;
        let rings = decode_topology(json, "land").unwrap();
        assert_eq!(rings[0], vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (10.0, 0.0)]);
    }

    #[test]
    fn missing_object_and_bad_arcs_are_errors() {
        assert!(matches!(
            decode_topology(SAMPLE, "countries"),
            Err(DataError::MissingObject(_))
        ));
        let json = r#"{"type":"Topology","arcs":[],
            "objects":{"land":{"type":"LineString","arcs":[3]}}}"#;
        assert!(matches!(
            decode_topology(json, "land"),
            Err(DataError::BadArc { index: 3, count: 0 })
        ));
        assert!(matches!(decode_topology("not json", "land"), Err(DataError::Json { .. })));
    }

    #[test]
    fn builtin_outline_rings_are_closed() {
        let rings = builtin_outline();
        assert_eq!(rings.len(), 10);
        for ring in rings {
            assert_eq!(ring.first(), ring.last());
            assert!(ring.iter().all(|&(lon, lat)| lon.abs() <= 180.0 && lat.abs() <= 90.0));
        }
    }

    #[test]
    fn load_without_sources_uses_builtin() {
        let rings = load(Some(Path::new("/nonexistent/land.json")), None);
        assert_eq!(rings.len(), builtin_outline().len());
    }
}
