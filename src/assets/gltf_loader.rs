//! glTF loading: every triangle primitive of the default scene, flattened
//! into model space.

use std::path::{Path, PathBuf};

use glam::{Mat3, Mat4, Vec3};
use gltf::mesh::Mode;

use super::{AnimationClip, AssetError, AssetLoader, LoadedModel, Material, MeshData, Vertex};
use crate::util::color::Color;

/// Loads `.gltf` / `.glb` files from a directory on disk.
///
/// Gallery paths are written web-style (`/ballon_dog/scene.gltf`); the
/// leading slash is stripped and the rest is joined onto `root`.
#[derive(Debug, Clone)]
pub struct GltfLoader {
    root: PathBuf,
}

impl GltfLoader {
    /// Loader resolving paths against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path for a gallery asset path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl AssetLoader for GltfLoader {
    fn load(&self, path: &str) -> Result<LoadedModel, AssetError> {
        let resolved = self.resolve(path);
        if !resolved.exists() {
            return Err(AssetError::NotFound(resolved));
        }
        load_gltf_model(&resolved)
    }
}

/// Import a glTF file and flatten its default scene.
///
/// # Errors
///
/// [`AssetError::Import`] when the importer fails and
/// [`AssetError::NoGeometry`] when no triangle primitive is found.
pub fn load_gltf_model(path: &Path) -> Result<LoadedModel, AssetError> {
    let (doc, buffers, _images) =
        gltf::import(path).map_err(|e| AssetError::Import {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut meshes = Vec::new();
    let scene = doc.default_scene().or_else(|| doc.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes);
        }
    }

    if meshes.is_empty() {
        return Err(AssetError::NoGeometry(path.to_path_buf()));
    }

    let clips = doc
        .animations()
        .enumerate()
        .map(|(i, anim)| {
            let duration = anim
                .channels()
                .filter_map(|channel| {
                    let reader = channel.reader(|b| {
                        buffers.get(b.index()).map(|data| data.0.as_slice())
                    });
                    reader.read_inputs().map(|inputs| inputs.fold(0.0_f32, f32::max))
                })
                .fold(0.0_f32, f32::max);
            AnimationClip {
                name: anim
                    .name()
                    .map_or_else(|| format!("clip{i}"), str::to_owned),
                duration,
            }
        })
        .collect();

    let model = LoadedModel { meshes, clips };
    log::debug!(
        "{}: {} meshes, {} triangles, {} clips",
        path.display(),
        model.meshes.len(),
        model.triangle_count(),
        model.clips.len()
    );
    Ok(model)
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = if world.determinant().abs() > f32::EPSILON {
            Mat3::from_mat4(world).inverse().transpose()
        } else {
            Mat3::IDENTITY
        };
        for prim in mesh.primitives() {
            if prim.mode() != Mode::Triangles {
                log::debug!("skipping non-triangle primitive ({:?})", prim.mode());
                continue;
            }
            if let Some(data) = read_primitive(&prim, buffers, world, normal_matrix) {
                out.push(data);
            }
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn read_primitive(
    prim: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
    world: Mat4,
    normal_matrix: Mat3,
) -> Option<MeshData> {
    let reader = prim.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));
    let positions: Vec<Vec3> = reader
        .read_positions()?
        .map(|p| world.transform_point3(Vec3::from_array(p)))
        .collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(read) => read.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.len() < 3 || indices.iter().any(|&i| i as usize >= positions.len()) {
        return None;
    }

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(it) => it
            .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
            .collect(),
        None => smooth_normals(&positions, &indices),
    };

    let vertices = positions
        .iter()
        .zip(normals.iter().chain(std::iter::repeat(&Vec3::Y)))
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect();

    let material = prim.material();
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    Some(MeshData {
        vertices,
        indices,
        material: Material {
            base_color: Color { r, g, b, a },
            roughness: pbr.roughness_factor(),
            metalness: pbr.metallic_factor(),
            transparent: material.alpha_mode() == gltf::material::AlphaMode::Blend,
        },
    })
}

/// Area-weighted vertex normals for primitives that ship without them.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO {
                Vec3::Y
            } else {
                n
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_strips_web_root() {
        let loader = GltfLoader::new("assets");
        assert_eq!(
            loader.resolve("/ballon_dog/scene.gltf"),
            Path::new("assets").join("ballon_dog/scene.gltf")
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let loader = GltfLoader::new("/definitely/not/here");
        let err = loader.load("/GLaDOS/scene.gltf").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn garbage_file_is_import_error() {
        let dir = std::env::temp_dir().join("vitrine-gltf-garbage");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.gltf"), "{ not gltf").unwrap();
        let loader = GltfLoader::new(&dir);
        let err = loader.load("/broken.gltf").unwrap_err();
        assert!(matches!(err, AssetError::Import { .. }));
    }

    #[test]
    fn smooth_normals_of_a_flat_triangle_face_up() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::NEG_Z];
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!((n - Vec3::Y).length() < 1e-6);
        }
    }
}
