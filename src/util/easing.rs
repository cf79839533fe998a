//! Frame-rate independent exponential damping.
//!
//! Every animated quantity in the gallery (portal blend factors, camera eye
//! and target) moves toward its goal with the same first-order decay:
//!
//! ```text
//! next = current + (target - current) * (1 - e^(-2·dt / smooth_time))
//! ```
//!
//! The step factor stays in `[0, 1)`, so a damped value approaches its target
//! monotonically and never overshoots, no matter how the frame times vary or
//! how often the target flips.

use glam::Vec3;

/// Distance below which a damped value snaps onto its target.
pub const SNAP_EPSILON: f32 = 1e-3;

/// Smallest accepted smooth time; guards the division in [`damp_factor`].
const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Fraction of the remaining distance covered in a step of `dt` seconds.
///
/// `smooth_time` is roughly the time needed to cover ~86% of the distance.
/// Negative `dt` is treated as zero.
#[inline]
#[must_use]
pub fn damp_factor(smooth_time: f32, dt: f32) -> f32 {
    let omega = 2.0 / smooth_time.max(MIN_SMOOTH_TIME);
    1.0 - (-omega * dt.max(0.0)).exp()
}

/// Damp a scalar toward `target`.
#[inline]
#[must_use]
pub fn damp(current: f32, target: f32, smooth_time: f32, dt: f32) -> f32 {
    let next = current + (target - current) * damp_factor(smooth_time, dt);
    if (target - next).abs() < SNAP_EPSILON {
        target
    } else {
        next
    }
}

/// Damp a point toward `target`, component-wise along the straight line.
#[inline]
#[must_use]
pub fn damp_vec3(current: Vec3, target: Vec3, smooth_time: f32, dt: f32) -> Vec3 {
    let next = current.lerp(target, damp_factor(smooth_time, dt));
    if next.distance_squared(target) < SNAP_EPSILON * SNAP_EPSILON {
        target
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dt_leaves_value_alone() {
        assert_eq!(damp(0.3, 1.0, 0.2, 0.0), 0.3);
    }

    #[test]
    fn factor_is_bounded() {
        for dt in [0.0, 0.001, 0.016, 0.1, 1.0, 100.0] {
            let k = damp_factor(0.2, dt);
            assert!((0.0..=1.0).contains(&k), "factor {k} out of range");
        }
    }

    #[test]
    fn converges_and_snaps() {
        let mut x = 0.0;
        for _ in 0..200 {
            x = damp(x, 1.0, 0.2, 1.0 / 60.0);
        }
        assert_eq!(x, 1.0);
    }

    #[test]
    fn never_overshoots_with_huge_step() {
        let x = damp(0.0, 1.0, 0.2, 50.0);
        assert!(x <= 1.0);
        let y = damp(1.0, 0.0, 0.2, 50.0);
        assert!(y >= 0.0);
    }

    #[test]
    fn degenerate_smooth_time_is_clamped() {
        let x = damp(0.0, 1.0, 0.0, 1.0 / 60.0);
        assert!(x.is_finite());
        assert!(x <= 1.0);
    }

    #[test]
    fn vec3_moves_along_segment() {
        let a = Vec3::new(0.0, 0.0, 2.0);
        let b = Vec3::new(1.0, 2.0, -1.0);
        let p = damp_vec3(a, b, 0.25, 0.05);
        let t = damp_factor(0.25, 0.05);
        assert!((p - a.lerp(b, t)).length() < 1e-6);
    }
}
