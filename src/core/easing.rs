use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Easing curves used by the globe and radar transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    Linear,
    #[default]
    CubicOut,
    /// Elastic ease-out with amplitude 1 and period 0.3.
    ElasticOut,
}

const ELASTIC_AMPLITUDE: f64 = 1.0;
const ELASTIC_PERIOD: f64 = 0.3;

impl Easing {
    /// Maps normalized time in `[0, 1]` to eased progress.
    ///
    /// Input is clamped; output may overshoot 1 for elastic curves.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::ElasticOut => elastic_out(t),
        }
    }
}

fn elastic_out(t: f64) -> f64 {
    let period = ELASTIC_PERIOD / TAU;
    let shift = (1.0 / ELASTIC_AMPLITUDE).asin() * period;
    1.0 - ELASTIC_AMPLITUDE * tpmt(t) * ((t + shift) / period).sin()
}

/// `2^(-10 t)` rescaled so that `tpmt(0) == 1` and `tpmt(1) == 0`.
fn tpmt(x: f64) -> f64 {
    ((-10.0 * x).exp2() - 0.000_976_562_5) * 1.000_977_517_106_549_4
}
