//! Latitude/longitude grid lines

/// Degrees between minor grid lines
const MINOR_STEP: f64 = 10.0;
/// Minor meridians stop short of the poles so they don't bunch up
const MINOR_EXTENT: f64 = 80.0;
/// Sampling resolution along each line, degrees
const PRECISION: f64 = 2.5;

/// Grid as polylines of `(lon, lat)` degrees: meridians every 10° between
/// ±80°, full pole-to-pole meridians every 90°, and parallels every 10°.
pub fn graticule() -> Vec<Vec<(f64, f64)>> {
    let mut lines = Vec::new();

    let mut lon = -180.0;
    while lon < 180.0 {
        let extent = if lon % 90.0 == 0.0 { 90.0 } else { MINOR_EXTENT };
        lines.push(meridian(lon, -extent, extent));
        lon += MINOR_STEP;
    }

    let mut lat = -MINOR_EXTENT;
    while lat <= MINOR_EXTENT {
        lines.push(parallel(lat));
        lat += MINOR_STEP;
    }

    lines
}

fn meridian(lon: f64, lat0: f64, lat1: f64) -> Vec<(f64, f64)> {
    let n = ((lat1 - lat0) / PRECISION).ceil() as usize;
    (0..=n)
        .map(|i| (lon, lat0 + (lat1 - lat0) * i as f64 / n as f64))
        .collect()
}

fn parallel(lat: f64) -> Vec<(f64, f64)> {
    let n = (360.0 / PRECISION).ceil() as usize;
    (0..=n)
        .map(|i| (-180.0 + 360.0 * i as f64 / n as f64, lat))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_counts() {
        let lines = graticule();
        // 36 meridians and 17 parallels
        assert_eq!(lines.len(), 36 + 17);
    }

    #[test]
    fn only_major_meridians_reach_the_poles() {
        let lines = graticule();
        let reaching: Vec<f64> = lines
            .iter()
            .filter(|l| l.iter().any(|&(_, lat)| lat.abs() >= 90.0))
            .map(|l| l[0].0)
            .collect();
        assert_eq!(reaching, vec![-180.0, -90.0, 0.0, 90.0]);
    }
}
