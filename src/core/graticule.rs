use serde::{Deserialize, Serialize};

use crate::core::types::GeoPoint;
use crate::error::{AtlasError, AtlasResult};

/// Latitude/longitude grid layout.
///
/// Defaults give meridians and parallels every 10°. Minor meridians stop at
/// ±80° latitude, major meridians (every 90°) run pole to pole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraticuleSpec {
    pub minor_step_deg: f64,
    pub major_meridian_step_deg: f64,
    pub minor_extent_lat_deg: f64,
    /// Angular spacing of the sample points along each line.
    pub precision_deg: f64,
}

impl Default for GraticuleSpec {
    fn default() -> Self {
        Self {
            minor_step_deg: 10.0,
            major_meridian_step_deg: 90.0,
            minor_extent_lat_deg: 80.0,
            precision_deg: 2.5,
        }
    }
}

impl GraticuleSpec {
    pub fn validate(self) -> AtlasResult<Self> {
        for (value, name) in [
            (self.minor_step_deg, "minor_step_deg"),
            (self.major_meridian_step_deg, "major_meridian_step_deg"),
            (self.minor_extent_lat_deg, "minor_extent_lat_deg"),
            (self.precision_deg, "precision_deg"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AtlasError::InvalidData(format!(
                    "graticule `{name}` must be finite and > 0"
                )));
            }
        }
        if self.minor_extent_lat_deg > 90.0 {
            return Err(AtlasError::InvalidData(
                "graticule minor extent must be <= 90".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Builds every grid line as a sampled polyline.
    pub fn lines(self) -> AtlasResult<Vec<Vec<GeoPoint>>> {
        let spec = self.validate()?;
        let mut lines = Vec::new();

        let mut lon = -180.0;
        while lon < 180.0 - 1e-9 {
            let is_major = (lon % spec.major_meridian_step_deg).abs() < 1e-9;
            let extent = if is_major {
                90.0
            } else {
                spec.minor_extent_lat_deg
            };
            lines.push(sample_meridian(lon, extent, spec.precision_deg));
            lon += spec.minor_step_deg;
        }

        let mut lat = -spec.minor_extent_lat_deg;
        while lat <= spec.minor_extent_lat_deg + 1e-9 {
            lines.push(sample_parallel(lat, spec.precision_deg));
            lat += spec.minor_step_deg;
        }

        Ok(lines)
    }
}

fn sample_meridian(lon: f64, extent: f64, precision: f64) -> Vec<GeoPoint> {
    let steps = ((2.0 * extent) / precision).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| GeoPoint::unchecked(lon, -extent + 2.0 * extent * i as f64 / steps as f64))
        .collect()
}

fn sample_parallel(lat: f64, precision: f64) -> Vec<GeoPoint> {
    let steps = (360.0 / precision).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| GeoPoint::unchecked(-180.0 + 360.0 * i as f64 / steps as f64, lat))
        .collect()
}
