//! CPU picking of portal windows.
//!
//! A pointer ray is intersected with each window's rounded rectangle in the
//! window's local frame; the nearest hit wins. Windows are double sided.

use glam::{Mat4, Vec2, Vec3};

/// Rounded rectangle in a window's local X/Y plane, centered on its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRect {
    /// Local-to-world transform.
    pub transform: Mat4,
    /// Full width.
    pub width: f32,
    /// Full height.
    pub height: f32,
    /// Corner radius.
    pub corner_radius: f32,
}

impl WindowRect {
    /// Ray parameter of the hit, if the ray crosses the rectangle in front of
    /// its origin.
    #[must_use]
    pub fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let inv = self.transform.inverse();
        let o = inv.transform_point3(origin);
        let d = inv.transform_vector3(dir);
        if d.z.abs() < 1e-6 {
            return None;
        }
        let t = -o.z / d.z;
        if t < 0.0 {
            return None;
        }
        let hit = o + d * t;
        self.contains(Vec2::new(hit.x, hit.y)).then_some(t)
    }

    fn contains(&self, p: Vec2) -> bool {
        let half = Vec2::new(self.width, self.height) * 0.5;
        let p = p.abs();
        if p.x > half.x || p.y > half.y {
            return false;
        }
        let r = self.corner_radius.clamp(0.0, half.min_element());
        let corner = (p - (half - Vec2::splat(r))).max(Vec2::ZERO);
        corner.length_squared() <= r * r
    }
}

/// Index of the nearest window hit by the ray.
#[must_use]
pub fn pick_nearest<I>(origin: Vec3, dir: Vec3, windows: I) -> Option<usize>
where
    I: IntoIterator<Item = WindowRect>,
{
    windows
        .into_iter()
        .enumerate()
        .filter_map(|(i, w)| w.intersect(origin, dir).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(at: Vec3) -> WindowRect {
        WindowRect {
            transform: Mat4::from_translation(at),
            width: 1.0,
            height: 1.6,
            corner_radius: 0.1,
        }
    }

    #[test]
    fn hits_center() {
        let t = rect(Vec3::ZERO).intersect(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        assert_eq!(t, Some(2.0));
    }

    #[test]
    fn misses_outside_and_behind() {
        let r = rect(Vec3::ZERO);
        assert!(r.intersect(Vec3::new(0.6, 0.0, 2.0), Vec3::NEG_Z).is_none());
        assert!(r.intersect(Vec3::new(0.0, 0.0, 2.0), Vec3::Z).is_none());
        assert!(r.intersect(Vec3::new(0.0, 0.0, 2.0), Vec3::X).is_none());
    }

    #[test]
    fn rounded_corner_is_cut() {
        let r = rect(Vec3::ZERO);
        // Inside the bounding box but outside the corner arc.
        assert!(r.intersect(Vec3::new(0.495, 0.795, 1.0), Vec3::NEG_Z).is_none());
        assert!(r.intersect(Vec3::new(0.45, 0.75, 1.0), Vec3::NEG_Z).is_some());
    }

    #[test]
    fn back_face_is_pickable() {
        let t = rect(Vec3::ZERO).intersect(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);
        assert_eq!(t, Some(1.0));
    }

    #[test]
    fn nearest_window_wins() {
        let windows = [rect(Vec3::new(0.0, 0.0, -3.0)), rect(Vec3::new(0.0, 0.0, -1.0))];
        assert_eq!(pick_nearest(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z, windows), Some(1));
        assert_eq!(pick_nearest(Vec3::new(5.0, 0.0, 2.0), Vec3::NEG_Z, windows), None);
    }
}
