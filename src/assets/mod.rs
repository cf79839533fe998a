//! Model assets: CPU-side mesh types, the loader seam, and background
//! loading.
//!
//! The gallery never parses an asset format itself. It hands each model path
//! to an [`AssetLoader`] and consumes the returned [`LoadedModel`]: flattened
//! triangle meshes with a simple PBR material plus the list of animation
//! clips. [`gltf_loader::GltfLoader`] is the stock implementation.

/// Parallel loads and the settle-tracking gate.
pub mod gate;
/// glTF import via the `gltf` crate.
pub mod gltf_loader;
/// Fixed list of model paths to pre-warm.
pub mod registry;

use std::fmt;
use std::path::PathBuf;

pub use gate::{AssetSlot, LoadingGate};
pub use gltf_loader::GltfLoader;
pub use registry::ModelRegistry;

use crate::util::color::Color;

/// Vertex layout shared by the loader and the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Unit normal in model space.
    pub normal: [f32; 3],
}

/// Surface parameters of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base color; alpha is the opacity when `transparent` is set.
    pub base_color: Color,
    /// Perceptual roughness in `[0, 1]`.
    pub roughness: f32,
    /// Metalness in `[0, 1]`.
    pub metalness: f32,
    /// Whether the mesh is alpha blended.
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            transparent: false,
        }
    }
}

/// One triangle mesh, already transformed into model space.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Surface material.
    pub material: Material,
}

/// An animation clip shipped with a model.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Clip name (or `clip<N>` when unnamed).
    pub name: String,
    /// Length in seconds.
    pub duration: f32,
}

/// Everything the gallery consumes from a loaded model.
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    /// Flattened meshes of the model's scene.
    pub meshes: Vec<MeshData>,
    /// Animation clips; all of them play in a loop once attached.
    pub clips: Vec<AnimationClip>,
}

impl LoadedModel {
    /// Total triangle count over all meshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

/// Why a model failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The resolved file does not exist.
    NotFound(PathBuf),
    /// The importer rejected the file.
    Import {
        /// Resolved path.
        path: PathBuf,
        /// Importer message.
        message: String,
    },
    /// The file imported but contains no triangle geometry.
    NoGeometry(PathBuf),
    /// The background load could not be started.
    Worker(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "{} not found", path.display()),
            Self::Import { path, message } => {
                write!(f, "failed to import {}: {message}", path.display())
            }
            Self::NoGeometry(path) => {
                write!(f, "no geometry found in {}", path.display())
            }
            Self::Worker(msg) => write!(f, "load worker failed: {msg}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Loads a model from an asset path.
///
/// Implementations run on background threads, one call per registered path.
pub trait AssetLoader: Send + Sync {
    /// Load the model at `path` (as written in the gallery configuration).
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] describing why the model is unavailable.
    fn load(&self, path: &str) -> Result<LoadedModel, AssetError>;
}
