use glam::{UVec2, Vec2, Vec3, Vec4};

use super::core::Camera;
use super::rig::CameraPose;
use crate::options::CameraOptions;
use crate::util::easing::damp_vec3;

/// Look-at camera that eases toward a requested pose.
///
/// The rig hands over a target pose every frame through
/// [`set_look_at`](Self::set_look_at); [`update`](Self::update) then moves
/// the eye and the look-at point toward it with exponential damping. The
/// polar angle of the eye around the look-at point is kept inside
/// `[min_polar_angle, max_polar_angle]` (measured from straight up), so the
/// camera never dips below the floor plane of its target.
pub struct CameraController {
    /// Current camera state.
    pub camera: Camera,
    target: CameraPose,
    smooth_time: f32,
    min_polar_angle: f32,
    max_polar_angle: f32,
}

impl CameraController {
    /// Controller resting at `pose`.
    #[must_use]
    pub fn new(options: &CameraOptions, pose: CameraPose, aspect: f32) -> Self {
        let camera = Camera {
            eye: pose.eye,
            target: pose.focus,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };
        let mut controller = Self {
            camera,
            target: pose,
            smooth_time: options.smooth_time,
            min_polar_angle: options.min_polar_angle,
            max_polar_angle: options.max_polar_angle,
        };
        controller.clamp_polar();
        controller
    }

    /// Request a new pose. With `smooth` unset the camera jumps there.
    pub fn set_look_at(&mut self, pose: CameraPose, smooth: bool) {
        self.target = pose;
        if !smooth {
            self.camera.eye = pose.eye;
            self.camera.target = pose.focus;
            self.clamp_polar();
        }
    }

    /// Pose the controller is moving toward.
    #[must_use]
    pub fn target_pose(&self) -> CameraPose {
        self.target
    }

    /// Pose the camera currently has.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.camera.eye,
            focus: self.camera.target,
        }
    }

    /// Whether the camera has reached its target pose.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.camera.eye == self.target.eye && self.camera.target == self.target.focus
    }

    /// Advance toward the target pose by `dt` seconds.
    ///
    /// Returns `true` while the camera is still moving.
    pub fn update(&mut self, dt: f32) -> bool {
        let moving = !self.is_settled();
        if moving {
            self.camera.eye =
                damp_vec3(self.camera.eye, self.target.eye, self.smooth_time, dt);
            self.camera.target = damp_vec3(
                self.camera.target,
                self.target.focus,
                self.smooth_time,
                dt,
            );
            self.clamp_polar();
        }
        moving
    }

    /// Keep the eye's polar angle inside the configured limits, preserving
    /// distance and azimuth. Poses already inside the limits are untouched.
    fn clamp_polar(&mut self) {
        let offset = self.camera.eye - self.camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        if phi >= self.min_polar_angle && phi <= self.max_polar_angle {
            return;
        }
        let phi = phi.clamp(self.min_polar_angle, self.max_polar_angle);
        let theta = offset.x.atan2(offset.z);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        self.camera.eye = self.camera.target
            + Vec3::new(
                radius * sin_phi * sin_theta,
                radius * cos_phi,
                radius * sin_phi * cos_theta,
            );
    }

    /// Update the aspect ratio for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Convert a screen position (physical pixels, origin top-left) to a
    /// world-space ray `(origin, direction)`.
    #[must_use]
    pub fn screen_to_ray(&self, screen: Vec2, size: UVec2) -> (Vec3, Vec3) {
        let size = size.max(UVec2::ONE).as_vec2();
        // NDC (-1 to 1), y flipped for screen coordinates
        let ndc_x = (screen.x / size.x) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen.y / size.y) * 2.0;

        let inv_view_proj = self.camera.build_matrix().inverse();

        // wgpu depth range is [0, 1]
        let world_near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let world_far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let origin = world_near.truncate() / world_near.w;
        let far = world_far.truncate() / world_far.w;
        let dir = (far - origin).try_normalize().unwrap_or(self.camera.forward());
        (origin, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(eye: Vec3, focus: Vec3) -> CameraPose {
        CameraPose { eye, focus }
    }

    fn controller() -> CameraController {
        CameraController::new(
            &CameraOptions::default(),
            pose(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO),
            1.0,
        )
    }

    #[test]
    fn default_pose_is_kept_exactly() {
        let c = controller();
        assert_eq!(c.camera.eye, Vec3::new(0.0, 0.0, 2.0));
        assert!(c.is_settled());
    }

    #[test]
    fn damps_toward_target_and_settles() {
        let mut c = controller();
        let goal = pose(Vec3::new(1.0, 2.0, 1.0), Vec3::new(1.0, 1.0, -1.0));
        c.set_look_at(goal, true);
        assert!(c.update(1.0 / 60.0));
        assert_ne!(c.camera.eye, goal.eye);
        for _ in 0..600 {
            let _ = c.update(1.0 / 60.0);
        }
        assert!(c.is_settled());
        assert!(!c.update(1.0 / 60.0));
    }

    #[test]
    fn jump_without_smoothing() {
        let mut c = controller();
        let goal = pose(Vec3::new(0.0, 3.0, 3.0), Vec3::ZERO);
        c.set_look_at(goal, false);
        assert_eq!(c.pose(), goal);
    }

    #[test]
    fn eye_below_target_is_lifted_to_horizon() {
        let mut c = controller();
        c.set_look_at(pose(Vec3::new(0.0, -2.0, 2.0), Vec3::ZERO), false);
        let offset = c.camera.eye - c.camera.target;
        assert!(offset.y.abs() < 1e-5);
        assert!((offset.length() - 8.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn center_ray_points_at_target() {
        let c = controller();
        let (origin, dir) = c.screen_to_ray(Vec2::new(50.0, 50.0), UVec2::new(100, 100));
        assert!((dir - Vec3::NEG_Z).length() < 1e-4);
        assert!(origin.z < 2.0 && origin.z > 1.8);
    }
}
