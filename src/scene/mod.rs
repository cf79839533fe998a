//! Retained scene graph for the gallery.
//!
//! Nodes carry an optional name, a parent link and a local TRS transform.
//! World transforms are resolved on demand by walking up the parent chain;
//! the gallery is a few dozen nodes deep at most, so nothing is cached.
//!
//! Every node has exactly one writer: the component that created it. Frames
//! mutate only their own model node; the gallery writes the layout nodes once
//! at construction.

/// Per-frame render list emitted for the render collaborator.
pub mod description;

use glam::{EulerRot, Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Local translation / Euler rotation / scale.
///
/// Rotation is XYZ Euler angles in radians, matching how gallery layouts are
/// authored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset from the parent origin.
    pub translation: Vec3,
    /// Euler angles (XYZ order), radians.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Translation followed by rotation.
    #[must_use]
    pub fn from_translation_rotation(translation: Vec3, rotation: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Rotation as a quaternion.
    #[must_use]
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local matrix (`T * R * S`).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: Option<String>,
    parent: Option<NodeId>,
    local: Transform,
}

/// Flat node storage with parent links and a name index.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    by_name: FxHashMap<String, NodeId>,
}

impl SceneGraph {
    /// Empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. The first node registered under a name wins lookups.
    pub fn add(
        &mut self,
        parent: Option<NodeId>,
        name: Option<&str>,
        local: Transform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(name) = name {
            let _ = self.by_name.entry(name.to_owned()).or_insert(id);
        }
        self.nodes.push(Node {
            name: name.map(str::to_owned),
            parent,
            local,
        });
        id
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a node up by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Name of a node.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).and_then(|n| n.name.as_deref())
    }

    /// Parent of a node (`None` for roots and unknown ids).
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Local transform of a node.
    #[must_use]
    pub fn local(&self, id: NodeId) -> Option<&Transform> {
        self.nodes.get(id.0).map(|n| &n.local)
    }

    /// Mutable local transform, for the node's owner.
    pub fn local_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.0).map(|n| &mut n.local)
    }

    /// Local-to-world matrix of a node (identity for unknown ids).
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(current.0) else {
                break;
            };
            matrix = node.local.matrix() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// Convert a point in a node's local frame to world space.
    #[must_use]
    pub fn local_to_world(&self, id: NodeId, point: Vec3) -> Vec3 {
        self.world_matrix(id).transform_point3(point)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut g = SceneGraph::new();
        let root = g.add(None, None, Transform::from_translation(Vec3::new(0.0, -0.8, 0.0)));
        let group = g.add(
            Some(root),
            None,
            Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        );
        let leaf = g.add(Some(group), Some("leaf"), Transform::IDENTITY);
        assert!(close(
            g.local_to_world(leaf, Vec3::new(0.0, 1.0, 0.0)),
            Vec3::new(1.0, 0.2, 0.0)
        ));
    }

    #[test]
    fn rotation_is_applied_before_translation() {
        let mut g = SceneGraph::new();
        let node = g.add(
            None,
            None,
            Transform::from_translation_rotation(Vec3::X, Vec3::new(0.0, FRAC_PI_2, 0.0)),
        );
        // +Z rotated a quarter turn about Y points along +X.
        assert!(close(g.local_to_world(node, Vec3::Z), Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn name_lookup_and_parent() {
        let mut g = SceneGraph::new();
        let a = g.add(None, Some("a"), Transform::IDENTITY);
        let b = g.add(Some(a), Some("b"), Transform::IDENTITY);
        let dup = g.add(None, Some("a"), Transform::IDENTITY);
        assert_eq!(g.find_by_name("b"), Some(b));
        assert_eq!(g.find_by_name("a"), Some(a));
        assert_ne!(g.find_by_name("a"), Some(dup));
        assert_eq!(g.parent(b), Some(a));
        assert_eq!(g.name(b), Some("b"));
        assert_eq!(g.find_by_name("missing"), None);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn owner_mutation_moves_world_position() {
        let mut g = SceneGraph::new();
        let n = g.add(None, None, Transform::IDENTITY);
        if let Some(local) = g.local_mut(n) {
            local.translation.y += 2.0;
        }
        assert!(close(g.local_to_world(n, Vec3::ZERO), Vec3::new(0.0, 2.0, 0.0)));
    }
}
