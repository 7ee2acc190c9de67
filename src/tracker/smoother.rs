//! Exponential smoothing of the target position.

use nalgebra::Point2;

/// Move `previous` toward `raw` by the fraction `alpha`, per axis.
///
/// `alpha = 1` follows the raw position exactly; smaller values trail it.
#[inline]
pub fn smooth(previous: &Point2<f32>, raw: &Point2<f32>, alpha: f32) -> Point2<f32> {
    *previous + (*raw - *previous) * alpha
}

/// Exponential position filter with a fixed smoothing factor.
#[derive(Debug, Clone, Copy)]
pub struct PositionSmoother {
    alpha: f32,
}

impl PositionSmoother {
    /// `alpha` is expected in (0, 1]; the config layer enforces this.
    pub fn new(alpha: f32) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn smooth(&self, previous: &Point2<f32>, raw: &Point2<f32>) -> Point2<f32> {
        smooth(previous, raw, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_interpolates() {
        let out = smooth(&Point2::new(0.0, 100.0), &Point2::new(100.0, 0.0), 0.3);
        assert!((out.x - 30.0).abs() < 1e-4);
        assert!((out.y - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_smooth_fixed_point() {
        let p = Point2::new(123.5, -7.25);
        for alpha in [0.01, 0.3, 0.5, 1.0] {
            assert_eq!(smooth(&p, &p, alpha), p);
        }
    }

    #[test]
    fn test_alpha_one_tracks_raw() {
        let smoother = PositionSmoother::new(1.0);
        let raw = Point2::new(42.0, 17.0);
        assert_eq!(smoother.smooth(&Point2::origin(), &raw), raw);
    }

    #[test]
    fn test_repeated_smoothing_converges() {
        let smoother = PositionSmoother::new(0.3);
        let target = Point2::new(320.0, 240.0);
        let mut p = Point2::origin();
        for _ in 0..60 {
            p = smoother.smooth(&p, &target);
        }
        assert!(nalgebra::distance(&p, &target) < 0.01);
    }
}
