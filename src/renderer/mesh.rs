//! Built-in geometry and GPU mesh upload.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::assets::{LoadedModel, Vertex};

/// Arc segments per rounded corner.
pub const CORNER_SEGMENTS: u32 = 8;

/// Vertex buffer layout matching [`Vertex`].
pub const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

/// Layout descriptor for [`Vertex`] buffers.
#[must_use]
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

fn vertex(x: f32, y: f32) -> Vertex {
    Vertex {
        position: [x, y, 0.0],
        normal: [0.0, 0.0, 1.0],
    }
}

/// Rounded rectangle centered on the origin in the XY plane, as a triangle
/// fan around a center vertex.
#[must_use]
pub fn rounded_rect(width: f32, height: f32, radius: f32, segments: u32) -> (Vec<Vertex>, Vec<u32>) {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let r = radius.clamp(0.0, hw.min(hh));
    let segments = segments.max(1);

    let corners = [
        (hw - r, hh - r, 0.0),
        (-hw + r, hh - r, FRAC_PI_2),
        (-hw + r, -hh + r, 2.0 * FRAC_PI_2),
        (hw - r, -hh + r, 3.0 * FRAC_PI_2),
    ];

    let mut vertices = vec![vertex(0.0, 0.0)];
    for (cx, cy, start) in corners {
        for i in 0..=segments {
            let angle = start + FRAC_PI_2 * i as f32 / segments as f32;
            let (sin, cos) = angle.sin_cos();
            vertices.push(vertex(cx + r * cos, cy + r * sin));
        }
    }

    let rim = vertices.len() as u32 - 1;
    let mut indices = Vec::with_capacity(rim as usize * 3);
    for i in 0..rim {
        indices.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % rim]);
    }
    (vertices, indices)
}

/// Unit square spanning `[0, 1]²`, used for screen-space quads.
#[must_use]
pub fn unit_quad() -> (Vec<Vertex>, Vec<u32>) {
    (
        vec![
            vertex(0.0, 0.0),
            vertex(1.0, 0.0),
            vertex(1.0, 1.0),
            vertex(0.0, 1.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// Unit square centered on the origin in the XY plane.
#[must_use]
pub fn centered_plane() -> (Vec<Vertex>, Vec<u32>) {
    (
        vec![
            vertex(-0.5, -0.5),
            vertex(0.5, -0.5),
            vertex(0.5, 0.5),
            vertex(-0.5, 0.5),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// Indexed mesh resident on the GPU.
pub struct GpuMesh {
    /// Vertex data.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle indices.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices.
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload vertices and indices.
    #[must_use]
    pub fn upload(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Bind and draw.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Identity of a loaded model for cache lookups.
#[must_use]
pub fn model_key(model: &Arc<LoadedModel>) -> usize {
    Arc::as_ptr(model) as usize
}

/// GPU copies of loaded models, uploaded on first sight.
#[derive(Default)]
pub struct ModelCache {
    // The Arc keeps the pointer key from being reused.
    entries: FxHashMap<usize, (Arc<LoadedModel>, Vec<GpuMesh>)>,
}

impl ModelCache {
    /// Upload `model` unless it is already resident.
    pub fn ensure(&mut self, device: &wgpu::Device, model: &Arc<LoadedModel>) {
        let key = model_key(model);
        if self.entries.contains_key(&key) {
            return;
        }
        let meshes = model
            .meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| {
                GpuMesh::upload(device, &format!("Model {key:x} Mesh {i}"), &mesh.vertices, &mesh.indices)
            })
            .collect();
        log::debug!("uploaded model {key:x} ({} meshes)", model.meshes.len());
        let _ = self.entries.insert(key, (Arc::clone(model), meshes));
    }

    /// Mesh `index` of the model with `key`.
    #[must_use]
    pub fn mesh(&self, key: usize, index: usize) -> Option<&GpuMesh> {
        self.entries.get(&key).and_then(|(_, meshes)| meshes.get(index))
    }
}
