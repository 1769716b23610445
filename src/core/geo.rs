//! Spherical geometry and the orthographic projection used by the globe.
//!
//! Conventions follow the usual web-mapping ones: longitude/latitude in
//! degrees, rotation given as `[lambda, phi]` where the point `[-lambda, -phi]`
//! ends up at the center of the view.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::core::types::{GeoPoint, ScreenPoint};
use crate::error::{AtlasError, AtlasResult};

const EPSILON: f64 = 1e-9;

/// Wraps a longitude into `[-180, 180)`.
#[must_use]
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped.abs() < EPSILON { 0.0 } else { wrapped }
}

/// Unit vector for a point given in radians.
#[must_use]
pub fn unit_vector(lon_rad: f64, lat_rad: f64) -> [f64; 3] {
    let cos_lat = lat_rad.cos();
    [lon_rad.cos() * cos_lat, lon_rad.sin() * cos_lat, lat_rad.sin()]
}

/// Great-circle angular distance between two points, in radians.
///
/// Uses the atan2 form, which stays accurate for both tiny and near-antipodal
/// separations.
#[must_use]
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lon0 = a.lon.to_radians();
    let lat0 = a.lat.to_radians();
    let lon1 = b.lon.to_radians();
    let lat1 = b.lat.to_radians();

    let delta_lon = (lon1 - lon0).abs();
    let (sin_delta, cos_delta) = delta_lon.sin_cos();
    let (sin_lat0, cos_lat0) = lat0.sin_cos();
    let (sin_lat1, cos_lat1) = lat1.sin_cos();

    let x = cos_lat1 * sin_delta;
    let y = cos_lat0 * sin_lat1 - sin_lat0 * cos_lat1 * cos_delta;
    let z = sin_lat0 * sin_lat1 + cos_lat0 * cos_lat1 * cos_delta;
    x.hypot(y).atan2(z)
}

/// Great-circle interpolator between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatCircle {
    from: GeoPoint,
    to: GeoPoint,
    start: [f64; 3],
    end: [f64; 3],
    distance: f64,
}

impl GreatCircle {
    #[must_use]
    pub fn new(from: GeoPoint, to: GeoPoint) -> Self {
        Self {
            from,
            to,
            start: unit_vector(from.lon.to_radians(), from.lat.to_radians()),
            end: unit_vector(to.lon.to_radians(), to.lat.to_radians()),
            distance: angular_distance(from, to),
        }
    }

    /// Arc length in radians.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Point at fraction `t` of the way along the arc.
    #[must_use]
    pub fn interpolate(&self, t: f64) -> GeoPoint {
        if self.distance < EPSILON {
            return self.from;
        }
        let sin_d = self.distance.sin();
        if sin_d.abs() < EPSILON {
            // Antipodal endpoints have no unique great circle.
            return GeoPoint::unchecked(
                self.from.lon + (self.to.lon - self.from.lon) * t,
                self.from.lat + (self.to.lat - self.from.lat) * t,
            );
        }

        let b = (t * self.distance).sin() / sin_d;
        let a = (self.distance - t * self.distance).sin() / sin_d;
        let x = a * self.start[0] + b * self.end[0];
        let y = a * self.start[1] + b * self.end[1];
        let z = a * self.start[2] + b * self.end[2];
        GeoPoint::unchecked(y.atan2(x).to_degrees(), z.atan2(x.hypot(y)).to_degrees())
    }

    /// Samples the arc with a maximum angular step (degrees) between points.
    ///
    /// Both endpoints are always included.
    #[must_use]
    pub fn sample(&self, max_step_deg: f64) -> Vec<GeoPoint> {
        let step = max_step_deg.max(0.01).to_radians();
        let segments = (self.distance / step).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(segments + 1);
        for i in 0..segments {
            points.push(self.interpolate(i as f64 / segments as f64));
        }
        points.push(self.to);
        points
    }
}

/// Orthographic projection state used for one draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthographicProjection {
    pub scale: f64,
    pub translate: ScreenPoint,
    /// `[lambda, phi]` in degrees.
    pub rotation: [f64; 2],
    /// Hemisphere clip radius in degrees around the view center.
    pub clip_angle_deg: f64,
}

impl OrthographicProjection {
    pub fn new(scale: f64, translate: ScreenPoint, rotation: [f64; 2]) -> AtlasResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(AtlasError::InvalidData(
                "projection scale must be finite and > 0".to_owned(),
            ));
        }
        if !translate.x.is_finite() || !translate.y.is_finite() {
            return Err(AtlasError::InvalidData(
                "projection translate must be finite".to_owned(),
            ));
        }
        if !rotation[0].is_finite() || !rotation[1].is_finite() {
            return Err(AtlasError::InvalidData(
                "projection rotation must be finite".to_owned(),
            ));
        }
        Ok(Self {
            scale,
            translate,
            rotation,
            clip_angle_deg: 90.0,
        })
    }

    /// Geographic point currently at the center of the view.
    #[must_use]
    pub fn view_center(&self) -> GeoPoint {
        GeoPoint::unchecked(-self.rotation[0], -self.rotation[1])
    }

    /// Rotates a point into view space and returns its unit vector.
    ///
    /// `x` points at the viewer, `y` to the right and `z` up.
    #[must_use]
    pub fn rotate(&self, point: GeoPoint) -> [f64; 3] {
        let lon = (point.lon + self.rotation[0]).to_radians();
        let lat = point.lat.to_radians();
        let [x, y, z] = unit_vector(lon, lat);

        let (sin_phi, cos_phi) = self.rotation[1].to_radians().sin_cos();
        [x * cos_phi - z * sin_phi, y, z * cos_phi + x * sin_phi]
    }

    /// Projects a point regardless of which hemisphere it lies on.
    #[must_use]
    pub fn project_unclipped(&self, point: GeoPoint) -> ScreenPoint {
        self.to_screen(self.rotate(point))
    }

    /// Projects a point, returning `None` when it falls outside the clip angle.
    #[must_use]
    pub fn project(&self, point: GeoPoint) -> Option<ScreenPoint> {
        let rotated = self.rotate(point);
        if rotated[0] < self.clip_angle_deg.to_radians().cos() - EPSILON {
            return None;
        }
        Some(self.to_screen(rotated))
    }

    /// Whether the point lies within `threshold_rad` of the view center.
    #[must_use]
    pub fn is_within(&self, point: GeoPoint, threshold_rad: f64) -> bool {
        angular_distance(point, self.view_center()) < threshold_rad
    }

    /// Projects a polyline, splitting it where it crosses the horizon.
    ///
    /// Crossing points are interpolated onto the horizon so runs end exactly
    /// at the globe's outline.
    #[must_use]
    pub fn project_line(&self, points: &[GeoPoint]) -> Vec<Vec<ScreenPoint>> {
        let mut runs = Vec::new();
        let mut current: Vec<ScreenPoint> = Vec::new();
        let mut previous: Option<[f64; 3]> = None;

        for point in points {
            let rotated = self.rotate(*point);
            let visible = rotated[0] >= 0.0;
            if let Some(prev) = previous {
                let prev_visible = prev[0] >= 0.0;
                if prev_visible != visible {
                    let crossing = self.to_screen(horizon_crossing(prev, rotated));
                    current.push(crossing);
                    if prev_visible {
                        if current.len() >= 2 {
                            runs.push(std::mem::take(&mut current));
                        } else {
                            current.clear();
                        }
                    }
                }
            }
            if visible {
                current.push(self.to_screen(rotated));
            }
            previous = Some(rotated);
        }
        if current.len() >= 2 {
            runs.push(current);
        }
        runs
    }

    /// Projects a closed ring, cutting hidden parts off along the horizon.
    ///
    /// Returns `None` when the ring is entirely on the far side. Hidden
    /// stretches are replaced by the shorter horizon arc between the exit and
    /// re-entry points.
    #[must_use]
    pub fn project_ring(&self, ring: &[GeoPoint]) -> Option<Vec<ScreenPoint>> {
        if ring.len() < 3 {
            return None;
        }
        let rotated: Vec<[f64; 3]> = ring.iter().map(|p| self.rotate(*p)).collect();
        let start = rotated.iter().position(|v| v[0] >= 0.0)?;

        let count = rotated.len();
        let mut out = Vec::with_capacity(count + 8);
        let mut exit_angle: Option<f64> = None;
        for offset in 0..=count {
            let index = (start + offset) % count;
            let prev = rotated[(index + count - 1) % count];
            let current = rotated[index];
            let prev_visible = prev[0] >= 0.0;
            let visible = current[0] >= 0.0;

            if offset > 0 && prev_visible != visible {
                let crossing = horizon_crossing(prev, current);
                let angle = crossing[2].atan2(crossing[1]);
                if prev_visible {
                    out.push(self.to_screen(crossing));
                    exit_angle = Some(angle);
                } else if let Some(exit) = exit_angle.take() {
                    self.push_horizon_arc(&mut out, exit, angle);
                    out.push(self.to_screen(crossing));
                }
            }
            if visible && offset < count {
                out.push(self.to_screen(current));
            }
        }

        (out.len() >= 3).then_some(out)
    }

    /// Screen-space outline of the visible disc.
    #[must_use]
    pub fn outline_radius(&self) -> f64 {
        self.scale * self.clip_angle_deg.to_radians().sin().min(1.0)
    }

    fn push_horizon_arc(&self, out: &mut Vec<ScreenPoint>, from: f64, to: f64) {
        let mut delta = (to - from).rem_euclid(TAU);
        if delta > PI {
            delta -= TAU;
        }
        let steps = (delta.abs() / 5f64.to_radians()).ceil() as usize;
        for i in 1..steps {
            let angle = from + delta * i as f64 / steps as f64;
            out.push(self.to_screen([0.0, angle.cos(), angle.sin()]));
        }
    }

    fn to_screen(&self, rotated: [f64; 3]) -> ScreenPoint {
        ScreenPoint::new(
            self.translate.x + self.scale * rotated[1],
            self.translate.y - self.scale * rotated[2],
        )
    }
}

/// Point where the chord between two view-space vectors meets the `x = 0`
/// plane, pushed back onto the unit sphere.
fn horizon_crossing(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let denominator = a[0] - b[0];
    let t = if denominator.abs() < EPSILON {
        0.5
    } else {
        a[0] / denominator
    };
    let y = a[1] + (b[1] - a[1]) * t;
    let z = a[2] + (b[2] - a[2]) * t;
    let norm = y.hypot(z);
    if norm < EPSILON {
        return [0.0, 1.0, 0.0];
    }
    [0.0, y / norm, z / norm]
}

/// Threshold a little inside the horizon, used for marker culling.
pub const MARKER_VISIBILITY_THRESHOLD_RAD: f64 = PI / 2.1;
