use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, AtlasResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    pub fn validate(self) -> AtlasResult<Self> {
        if !self.is_valid() {
            return Err(AtlasError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Geographic position in degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Builds a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(lon: f64, lat: f64) -> AtlasResult<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(AtlasError::InvalidData(
                "geo point coordinates must be finite".to_owned(),
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AtlasError::InvalidData(format!(
                "longitude {lon} must be in [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AtlasError::InvalidData(format!(
                "latitude {lat} must be in [-90, 90]"
            )));
        }
        Ok(Self { lon, lat })
    }

    /// Builds a point without range checks.
    ///
    /// Used for positions derived from rotation state, where longitude may
    /// wrap outside [-180, 180] before normalization.
    #[must_use]
    pub const fn unchecked(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[must_use]
    pub fn as_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Screen-space position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, Viewport};

    #[test]
    fn geo_point_rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(180.0, 90.0).is_ok());
        assert!(GeoPoint::new(-180.0, -90.0).is_ok());
        assert!(GeoPoint::new(180.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -90.1).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn viewport_center_is_half_extent() {
        assert_eq!(Viewport::new(800, 650).center(), (400.0, 325.0));
        assert!(Viewport::new(0, 10).validate().is_err());
    }
}
