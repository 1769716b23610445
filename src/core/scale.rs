use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, AtlasResult};

/// Linear mapping from a value domain onto a pixel range.
///
/// Values outside the domain extrapolate; no clamping is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> AtlasResult<Self> {
        let (domain_start, domain_end) = domain;
        let (range_start, range_end) = range;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(AtlasError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(AtlasError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    pub fn invert(self, pixel: f64) -> AtlasResult<f64> {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Err(AtlasError::InvalidData(
                "cannot invert a scale with an empty range".to_owned(),
            ));
        }
        if !pixel.is_finite() {
            return Err(AtlasError::InvalidData("pixel must be finite".to_owned()));
        }
        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::LinearScale;

    #[test]
    fn maps_and_extrapolates() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 110.0)).expect("scale");
        assert_abs_diff_eq!(scale.apply(0.0), 0.0);
        assert_abs_diff_eq!(scale.apply(5.0), 55.0);
        assert_abs_diff_eq!(scale.apply(12.0), 132.0, epsilon = 1e-9);
        assert_abs_diff_eq!(scale.invert(55.0).expect("invert"), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_domain_is_rejected() {
        assert!(LinearScale::new((1.0, 1.0), (0.0, 1.0)).is_err());
    }
}
