use crate::core::easing::Easing;
use crate::error::{AtlasError, AtlasResult};

/// Fixed-duration interpolation between two value vectors.
///
/// Progress is driven by explicit elapsed time so hosts stay in control of the
/// clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<const N: usize> {
    from: [f64; N],
    to: [f64; N],
    duration_ms: f64,
    elapsed_ms: f64,
    easing: Easing,
}

impl<const N: usize> Transition<N> {
    pub fn new(from: [f64; N], to: [f64; N], duration_ms: f64, easing: Easing) -> AtlasResult<Self> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(AtlasError::InvalidData(
                "transition duration must be finite and >= 0".to_owned(),
            ));
        }
        if from.iter().chain(to.iter()).any(|v| !v.is_finite()) {
            return Err(AtlasError::InvalidData(
                "transition endpoints must be finite".to_owned(),
            ));
        }
        Ok(Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
            easing,
        })
    }

    #[must_use]
    pub fn target(&self) -> [f64; N] {
        self.to
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Normalized time in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Current interpolated value.
    #[must_use]
    pub fn value(&self) -> [f64; N] {
        if self.is_finished() {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        let mut out = self.from;
        for (slot, (start, end)) in out.iter_mut().zip(self.from.iter().zip(self.to.iter())) {
            *slot = start + (end - start) * eased;
        }
        out
    }

    /// Advances the clock and returns the new value.
    pub fn advance(&mut self, delta_ms: f64) -> [f64; N] {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + delta_ms).min(self.duration_ms);
        }
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::Transition;
    use crate::core::easing::Easing;

    #[test]
    fn transition_reaches_target_exactly() {
        let mut transition =
            Transition::new([0.0, -15.0], [-10.0, 20.0], 2500.0, Easing::CubicOut).expect("valid");
        let mid = transition.advance(1250.0);
        assert!(mid[0] < -8.0 && mid[0] > -10.0);
        assert!(!transition.is_finished());
        let end = transition.advance(5000.0);
        assert_eq!(end, [-10.0, 20.0]);
        assert!(transition.is_finished());
    }

    #[test]
    fn zero_duration_is_immediately_finished() {
        let transition = Transition::new([1.0], [2.0], 0.0, Easing::Linear).expect("valid");
        assert!(transition.is_finished());
        assert_abs_diff_eq!(transition.value()[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn copies_advance_independently() {
        let mut original =
            Transition::new([0.0, 0.0], [90.0, -30.0], 1000.0, Easing::Linear).expect("valid");
        let snapshot = original;
        original.advance(500.0);
        assert_eq!(snapshot.value(), [0.0, 0.0]);
        assert_abs_diff_eq!(original.value()[0], 45.0, epsilon = 1e-12);
        assert_ne!(original, snapshot);
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert!(Transition::new([0.0], [1.0], -1.0, Easing::Linear).is_err());
    }
}
