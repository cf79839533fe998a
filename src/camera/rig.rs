//! Route-driven camera poses.

use glam::{Mat4, Vec3};

use crate::options::RigOptions;
use crate::scene::SceneGraph;

/// Eye position and look-at point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Look-at point in world space.
    pub focus: Vec3,
}

/// Chooses the camera pose for the active portal.
///
/// With a portal focused, the pose is the configured eye/focus offsets
/// carried into world space by the portal group (the parent of the node named
/// after the portal id). Without one, or when no node has that name, the
/// default pose is used.
#[derive(Debug, Clone)]
pub struct CameraRig {
    options: RigOptions,
}

impl CameraRig {
    /// Rig with the given poses.
    #[must_use]
    pub fn new(options: RigOptions) -> Self {
        Self { options }
    }

    /// The overview pose.
    #[must_use]
    pub fn default_pose(&self) -> CameraPose {
        CameraPose {
            eye: Vec3::from(self.options.default_eye),
            focus: Vec3::from(self.options.default_focus),
        }
    }

    /// Target pose for this frame's active id.
    #[must_use]
    pub fn pose(&self, graph: &SceneGraph, active_id: Option<&str>) -> CameraPose {
        let Some(id) = active_id else {
            return self.default_pose();
        };
        let Some(node) = graph.find_by_name(id) else {
            log::trace!("no scene node named {id:?}, using default pose");
            return self.default_pose();
        };
        let parent = graph
            .parent(node)
            .map_or(Mat4::IDENTITY, |p| graph.world_matrix(p));
        CameraPose {
            eye: parent.transform_point3(Vec3::from(self.options.eye_offset)),
            focus: parent.transform_point3(Vec3::from(self.options.focus_offset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::GOLDEN_RATIO;
    use crate::scene::Transform;

    fn graph() -> SceneGraph {
        let mut g = SceneGraph::new();
        let root = g.add(None, None, Transform::from_translation(Vec3::new(0.0, -0.8, 0.0)));
        let group = g.add(
            Some(root),
            None,
            Transform::from_translation(Vec3::new(1.15, 0.0, 0.0)),
        );
        let _ = g.add(
            Some(group),
            Some("03"),
            Transform::from_translation(Vec3::new(0.0, GOLDEN_RATIO / 2.0, 0.0)),
        );
        g
    }

    #[test]
    fn overview_uses_default_pose() {
        let rig = CameraRig::new(RigOptions::default());
        let pose = rig.pose(&graph(), None);
        assert_eq!(pose.eye, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(pose.focus, Vec3::ZERO);
    }

    #[test]
    fn unknown_id_uses_default_pose() {
        let rig = CameraRig::new(RigOptions::default());
        assert_eq!(rig.pose(&graph(), Some("99")), rig.default_pose());
    }

    #[test]
    fn focused_pose_follows_portal_group() {
        let rig = CameraRig::new(RigOptions::default());
        let pose = rig.pose(&graph(), Some("03"));
        let expected_eye = Vec3::new(1.15, GOLDEN_RATIO * 0.75 - 0.8, 0.25);
        let expected_focus = Vec3::new(1.15, GOLDEN_RATIO / 2.0 - 0.8, -2.0);
        assert!((pose.eye - expected_eye).length() < 1e-5);
        assert!((pose.focus - expected_focus).length() < 1e-5);
    }
}
