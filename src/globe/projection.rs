//! Orthographic projection of lon/lat degrees onto the 2D canvas

/// Current globe rotation, in degrees. `longitude` is unbounded; the
/// projection is periodic so consumers never need it wrapped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    pub longitude: f64,
    pub latitude: f64,
}

impl RotationState {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

/// Orthographic projection with a fixed scale, fixed translate and a clip
/// angle measured from the view center.
///
/// Rotation follows the `rotate([lambda, phi])` convention: the input
/// longitude is shifted by `lambda`, then the sphere is tilted by `phi`
/// about the horizontal screen axis. Canvas y grows downward.
#[derive(Clone, Debug)]
pub struct Orthographic {
    scale: f64,
    translate: (f64, f64),
    clip_cos: f64,
    rotation: RotationState,
}

impl Orthographic {
    pub fn new(scale: f64, translate: (f64, f64), clip_angle_deg: f64) -> Self {
        Self {
            scale,
            translate,
            clip_cos: clip_angle_deg.to_radians().cos(),
            rotation: RotationState::default(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> (f64, f64) {
        self.translate
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: RotationState) {
        self.rotation = rotation;
    }

    /// Rotate a geographic point into view space, returning radians.
    fn rotate(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lambda = (lon + self.rotation.longitude).to_radians();
        let phi = lat.to_radians();
        let (sin_dphi, cos_dphi) = self.rotation.latitude.to_radians().sin_cos();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * cos_dphi + x * sin_dphi;

        (y.atan2(x * cos_dphi - z * sin_dphi), k.clamp(-1.0, 1.0).asin())
    }

    /// True when the point is on the near side of the clip circle.
    pub fn is_visible(&self, lon: f64, lat: f64) -> bool {
        let (lambda, phi) = self.rotate(lon, lat);
        lambda.cos() * phi.cos() > self.clip_cos
    }

    /// Canvas position of a point whether or not it is clipped.
    pub fn project_unclipped(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (lambda, phi) = self.rotate(lon, lat);
        let x = phi.cos() * lambda.sin();
        let y = phi.sin();
        (self.translate.0 + x * self.scale, self.translate.1 - y * self.scale)
    }

    /// Canvas position of `(lon, lat)`, or `None` beyond the clip angle.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if self.is_visible(lon, lat) {
            Some(self.project_unclipped(lon, lat))
        } else {
            None
        }
    }

    /// Project a polyline, densifying each segment into `steps` pieces and
    /// splitting it wherever it crosses behind the clip circle.
    pub fn project_path(&self, points: &[(f64, f64)], steps: usize) -> Vec<Vec<(f64, f64)>> {
        let steps = steps.max(1);
        let mut runs = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();

        let mut push = |lon: f64, lat: f64, current: &mut Vec<(f64, f64)>| {
            match self.project(lon, lat) {
                Some(p) => current.push(p),
                None => {
                    if current.len() > 1 {
                        runs.push(std::mem::take(current));
                    } else {
                        current.clear();
                    }
                }
            }
        };

        for pair in points.windows(2) {
            let (lon1, lat1) = pair[0];
            let (lon2, lat2) = pair[1];
            // Shortest way round in longitude so antimeridian edges stay short
            let mut dlon = lon2 - lon1;
            if dlon > 180.0 {
                dlon -= 360.0;
            } else if dlon < -180.0 {
                dlon += 360.0;
            }
            for t in 0..steps {
                let frac = t as f64 / steps as f64;
                push(lon1 + dlon * frac, lat1 + (lat2 - lat1) * frac, &mut current);
            }
        }
        if let Some(&(lon, lat)) = points.last() {
            push(lon, lat, &mut current);
        }
        if current.len() > 1 {
            runs.push(current);
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn globe() -> Orthographic {
        Orthographic::new(250.0, (400.0, 400.0), 90.0)
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6
    }

    #[test]
    fn origin_projects_to_translate() {
        let p = globe().project(0.0, 0.0).unwrap();
        assert!(close(p, (400.0, 400.0)));
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let g = globe();
        let east = g.project(90.0, 0.0);
        // Exactly on the limb: cos(lambda) == 0 is not strictly visible
        assert!(east.is_none() || close(east.unwrap(), (650.0, 400.0)));
        let (x, _) = g.project(30.0, 0.0).unwrap();
        assert!(x > 400.0);
        let (_, y) = g.project(0.0, 30.0).unwrap();
        assert!(y < 400.0);
        assert!((y - (400.0 - 250.0 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn far_hemisphere_is_clipped() {
        let g = globe();
        assert!(g.project(180.0, 0.0).is_none());
        assert!(g.project(120.0, 10.0).is_none());
        assert!(g.project(60.0, 10.0).is_some());
    }

    #[test]
    fn longitude_rotation_shifts_the_view_center() {
        let mut g = globe();
        g.set_rotation(RotationState::new(-100.0, 0.0));
        assert!(close(g.project(100.0, 0.0).unwrap(), (400.0, 400.0)));
        assert!(g.project(0.0, 0.0).is_none());
    }

    #[test]
    fn negative_latitude_rotation_brings_the_north_into_view() {
        let mut g = globe();
        g.set_rotation(RotationState::new(0.0, -15.0));
        // Point at lat 15 comes to the center
        assert!(close(g.project(0.0, 15.0).unwrap(), (400.0, 400.0)));
    }

    #[test]
    fn projection_is_periodic_in_longitude() {
        let mut a = globe();
        let mut b = globe();
        a.set_rotation(RotationState::new(20.0, -15.0));
        b.set_rotation(RotationState::new(380.0, -15.0));
        let pa = a.project(10.0, 40.0).unwrap();
        let pb = b.project(10.0, 40.0).unwrap();
        assert!((pa.0 - pb.0).abs() < EPS.sqrt() && (pa.1 - pb.1).abs() < EPS.sqrt());
    }

    #[test]
    fn project_is_pure() {
        let mut g = globe();
        g.set_rotation(RotationState::new(33.0, -7.0));
        let first = g.project(12.0, 34.0);
        let second = g.project(12.0, 34.0);
        assert_eq!(first, second);
    }

    #[test]
    fn path_splits_at_the_limb() {
        let g = globe();
        // Equator from -170 to 170 through the visible center and the hidden back
        let line = vec![(-170.0, 0.0), (-45.0, 0.0), (45.0, 0.0), (170.0, 0.0)];
        let runs = g.project_path(&line, 20);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].iter().all(|&(x, _)| (150.0..=650.0).contains(&x)));

        let hidden = vec![(150.0, 0.0), (-150.0, 0.0)];
        assert!(g.project_path(&hidden, 10).is_empty());
    }
}
