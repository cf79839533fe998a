//! wgpu renderer for [`SceneDescription`]s.
//!
//! One render pass per frame against a depth-stencil target:
//!
//! 1. Portals are drawn from least to most blended. Each window writes its
//!    stencil reference (`index + 1`) and paints the nested background.
//! 2. The portal's floor and model meshes follow, stencil-tested against the
//!    same reference, so they only show through their own window.
//! 3. A blending portal lays a full-screen quad of its background over the
//!    view with `alpha = blend`; past the halfway point the quad also claims
//!    the whole stencil so the nested scene takes over the screen.
//! 4. The loading bar is drawn last in screen space.
//!
//! Labels, the mirror effect of reflective floors and bloom are carried in
//! the description but not drawn here.

/// Built-in geometry and GPU mesh upload.
pub mod mesh;
/// Render pipelines of the gallery pass.
pub mod pipeline;

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

use self::mesh::{centered_plane, model_key, rounded_rect, unit_quad, GpuMesh, ModelCache, CORNER_SEGMENTS};
use self::pipeline::GalleryPipelines;
use crate::assets::Material;
use crate::camera::core::CameraUniform;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthStencilTarget;
use crate::scene::description::{FloorDescription, PortalDescription, SceneDescription};
use crate::util::color::Color;

/// Byte stride between per-draw uniform slots (dynamic offset alignment).
const DRAW_STRIDE: usize = 256;

/// Blend above which a portal's nested scene owns the whole screen.
const TAKEOVER_BLEND: f32 = 0.5;

/// Per-frame uniforms (group 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    /// Camera matrices and position.
    pub camera: CameraUniform,
    /// `x` = ambient intensity.
    pub ambient: [f32; 4],
    /// Direction toward the fill light, `w` = intensity.
    pub directional: [f32; 4],
}

/// Per-draw uniforms (group 1, dynamic offset).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    /// Model-to-world.
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`.
    pub normal: [[f32; 4]; 4],
    /// Linear RGBA.
    pub color: [f32; 4],
    /// Screen rectangle in NDC for flat quads.
    pub rect: [f32; 4],
    /// Roughness, metalness, flat quad depth.
    pub material: [f32; 4],
    /// Spotlight position and intensity.
    pub spot_position: [f32; 4],
    /// Cosines of the outer and inner cone angles.
    pub spot_cone: [f32; 4],
}

/// Which geometry and pipeline a planned draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// Window of the portal at this index into `scene.portals`.
    Window(usize),
    /// Reflective floor plane.
    Floor,
    /// One mesh of a cached model.
    Mesh {
        /// [`mesh::model_key`] of the model.
        model: usize,
        /// Mesh index within the model.
        mesh: usize,
        /// Alpha blended.
        transparent: bool,
    },
    /// Full-screen blend quad.
    Fade,
    /// Full-screen blend quad that claims the stencil.
    Takeover,
    /// Screen-space overlay quad.
    Overlay,
}

/// One draw of the frame, in submission order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedDraw {
    /// Geometry and pipeline.
    pub kind: DrawKind,
    /// Stencil reference.
    pub stencil: u32,
    /// Uniform slot contents.
    pub uniform: DrawUniform,
}

/// Encodes authored sRGB colors for the linear shading space.
#[derive(Debug, Clone, Copy)]
struct Gamma(f32);

impl Gamma {
    fn linear(self, c: Color) -> [f32; 4] {
        [c.r.powf(self.0), c.g.powf(self.0), c.b.powf(self.0), c.a]
    }
}

fn base_uniform(color: [f32; 4]) -> DrawUniform {
    DrawUniform {
        model: Mat4::IDENTITY.to_cols_array_2d(),
        normal: Mat4::IDENTITY.to_cols_array_2d(),
        color,
        rect: [-1.0, -1.0, 1.0, 1.0],
        material: [1.0, 0.0, 1.0, 0.0],
        spot_position: [0.0; 4],
        spot_cone: [1.0, 1.0, 0.0, 0.0],
    }
}

fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() > f32::EPSILON {
        model.inverse().transpose()
    } else {
        model
    }
}

fn lit_uniform(portal: &PortalDescription, transform: Mat4, material: &Material, gamma: Gamma) -> DrawUniform {
    let light = &portal.spot_light;
    let outer = light.angle;
    let inner = outer * (1.0 - light.penumbra.clamp(0.0, 1.0));
    DrawUniform {
        model: transform.to_cols_array_2d(),
        normal: normal_matrix(transform).to_cols_array_2d(),
        color: gamma.linear(material.base_color),
        material: [material.roughness, material.metalness, 1.0, 0.0],
        spot_position: light.position.extend(light.intensity).to_array(),
        spot_cone: [outer.cos(), inner.cos(), 0.0, 0.0],
        ..base_uniform([1.0; 4])
    }
}

fn floor_material(floor: &FloorDescription) -> Material {
    Material {
        base_color: floor.color,
        roughness: floor.reflector.roughness,
        metalness: floor.reflector.metalness,
        transparent: false,
    }
}

/// Lay out every draw of a frame.
///
/// Pure function of the description; the GPU pass replays the plan.
#[must_use]
pub fn plan_draws(scene: &SceneDescription, gamma: f32) -> Vec<PlannedDraw> {
    let gamma = Gamma(gamma);
    let mut order: Vec<usize> = (0..scene.portals.len()).collect();
    order.sort_by(|&a, &b| scene.portals[a].blend.total_cmp(&scene.portals[b].blend));

    let mut draws = Vec::new();
    for index in order {
        let portal = &scene.portals[index];
        let stencil = index as u32 + 1;

        draws.push(PlannedDraw {
            kind: DrawKind::Window(index),
            stencil,
            uniform: DrawUniform {
                model: portal.window.transform.to_cols_array_2d(),
                ..base_uniform(gamma.linear(portal.background))
            },
        });

        if portal.blend > 0.0 {
            let kind = if portal.blend > TAKEOVER_BLEND {
                DrawKind::Takeover
            } else {
                DrawKind::Fade
            };
            draws.push(PlannedDraw {
                kind,
                stencil,
                uniform: base_uniform(gamma.linear(portal.background.with_alpha(portal.blend))),
            });
        }

        if let Some(floor) = &portal.floor {
            let transform = floor.transform * Mat4::from_scale(floor.size.extend(1.0));
            draws.push(PlannedDraw {
                kind: DrawKind::Floor,
                stencil,
                uniform: lit_uniform(portal, transform, &floor_material(floor), gamma),
            });
        }

        if let Some(instance) = &portal.model {
            let key = model_key(&instance.model);
            for (mesh, material) in instance.materials.iter().enumerate() {
                draws.push(PlannedDraw {
                    kind: DrawKind::Mesh {
                        model: key,
                        mesh,
                        transparent: material.transparent,
                    },
                    stencil,
                    uniform: lit_uniform(portal, instance.transform, material, gamma),
                });
            }
        }
    }

    if scene.loading {
        draws.extend(loading_bar(scene.loading_progress));
    }
    draws
}

fn loading_bar(progress: f32) -> [PlannedDraw; 2] {
    const LEFT: f32 = -0.3;
    const RIGHT: f32 = 0.3;
    const BOTTOM: f32 = -0.015;
    const TOP: f32 = 0.015;
    let fill = LEFT + (RIGHT - LEFT) * progress.clamp(0.0, 1.0);
    let quad = |rect: [f32; 4], color: [f32; 4]| PlannedDraw {
        kind: DrawKind::Overlay,
        stencil: 0,
        uniform: DrawUniform {
            rect,
            material: [1.0, 0.0, 0.0, 0.0],
            ..base_uniform(color)
        },
    };
    [
        quad([LEFT, BOTTOM, RIGHT, TOP], [0.0, 0.0, 0.0, 0.15]),
        quad([LEFT, BOTTOM, fill, TOP], [0.0, 0.0, 0.0, 0.8]),
    ]
}

/// Clear color: the gallery background, tinted toward the most-blended
/// portal's background.
#[must_use]
pub fn clear_color(scene: &SceneDescription) -> Color {
    scene
        .portals
        .iter()
        .max_by(|a, b| a.blend.total_cmp(&b.blend))
        .filter(|p| p.blend > 0.0)
        .map_or(scene.background, |p| scene.background.mix(p.background, p.blend))
}

fn frame_uniform(scene: &SceneDescription) -> FrameUniform {
    let direction = scene.directional.position.try_normalize().unwrap_or(Vec3::Y);
    let mut camera = CameraUniform::new();
    camera.update_view_proj(&scene.camera);
    FrameUniform {
        camera,
        ambient: [scene.ambient.intensity, 0.0, 0.0, 0.0],
        directional: direction.extend(scene.directional.intensity).to_array(),
    }
}

fn pack_draws(draws: &[PlannedDraw]) -> Vec<u8> {
    let mut bytes = vec![0_u8; draws.len().max(1) * DRAW_STRIDE];
    for (slot, draw) in bytes.chunks_exact_mut(DRAW_STRIDE).zip(draws) {
        let data = bytemuck::bytes_of(&draw.uniform);
        slot[..data.len()].copy_from_slice(data);
    }
    bytes
}

/// Draws [`SceneDescription`]s onto a [`RenderContext`] surface.
pub struct GalleryRenderer {
    pipelines: GalleryPipelines,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_buffer: DynamicBuffer,
    draw_bind_group: wgpu::BindGroup,
    depth: DepthStencilTarget,
    windows: FxHashMap<[u32; 3], GpuMesh>,
    quad: GpuMesh,
    plane: GpuMesh,
    models: ModelCache,
    gamma: f32,
}

impl GalleryRenderer {
    /// Create pipelines and buffers for `context`'s surface.
    #[must_use]
    pub fn new(context: &RenderContext, gamma: f32) -> Self {
        let device = &context.device;
        let pipelines = GalleryPipelines::new(device, context.format());

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Gallery Frame Uniforms"),
            size: size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gallery Frame Bind Group"),
            layout: &pipelines.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_buffer = DynamicBuffer::new(
            device,
            "Gallery Draw Uniforms",
            DRAW_STRIDE * 64,
            wgpu::BufferUsages::UNIFORM,
        );
        let draw_bind_group = Self::draw_bind_group(device, &pipelines, &draw_buffer);

        let (width, height) = context.size();
        let (qv, qi) = unit_quad();
        let (pv, pi) = centered_plane();

        Self {
            depth: DepthStencilTarget::new(device, width, height),
            quad: GpuMesh::upload(device, "Screen Quad", &qv, &qi),
            plane: GpuMesh::upload(device, "Floor Plane", &pv, &pi),
            pipelines,
            frame_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            windows: FxHashMap::default(),
            models: ModelCache::default(),
            gamma,
        }
    }

    fn draw_bind_group(
        device: &wgpu::Device,
        pipelines: &GalleryPipelines,
        buffer: &DynamicBuffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gallery Draw Bind Group"),
            layout: &pipelines.draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: buffer.buffer(),
                    offset: 0,
                    size: wgpu::BufferSize::new(size_of::<DrawUniform>() as u64),
                }),
            }],
        })
    }

    /// Match the depth-stencil target to a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width > 0 && height > 0 && self.depth.size() != (width, height) {
            self.depth = DepthStencilTarget::new(device, width, height);
        }
    }

    fn prepare(&mut self, context: &RenderContext, scene: &SceneDescription) -> Vec<PlannedDraw> {
        let device = &context.device;
        for portal in &scene.portals {
            let window = &portal.window;
            let key = [
                window.width.to_bits(),
                window.height.to_bits(),
                window.corner_radius.to_bits(),
            ];
            let _ = self.windows.entry(key).or_insert_with(|| {
                let (v, i) = rounded_rect(window.width, window.height, window.corner_radius, CORNER_SEGMENTS);
                GpuMesh::upload(device, "Portal Window", &v, &i)
            });
            if let Some(instance) = &portal.model {
                self.models.ensure(device, &instance.model);
            }
        }

        let draws = plan_draws(scene, self.gamma);
        context
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniform(scene)));
        if self.draw_buffer.write_bytes(device, &context.queue, &pack_draws(&draws)) {
            self.draw_bind_group = Self::draw_bind_group(device, &self.pipelines, &self.draw_buffer);
        }
        draws
    }

    fn window_mesh(&self, portal: &PortalDescription) -> Option<&GpuMesh> {
        let w = &portal.window;
        self.windows
            .get(&[w.width.to_bits(), w.height.to_bits(), w.corner_radius.to_bits()])
    }

    /// Render one frame to the surface.
    ///
    /// # Errors
    ///
    /// Returns the [`wgpu::SurfaceError`] if no frame could be acquired.
    pub fn render(&mut self, context: &RenderContext, scene: &SceneDescription) -> Result<(), wgpu::SurfaceError> {
        let frame = context.get_next_frame()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (width, height) = context.size();
        self.resize(&context.device, width, height);

        let draws = self.prepare(context, scene);
        let clear = Gamma(self.gamma).linear(clear_color(scene));

        let mut encoder = context.create_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Gallery Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear[0]),
                            g: f64::from(clear[1]),
                            b: f64::from(clear[2]),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Discard,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for (slot, draw) in draws.iter().enumerate() {
                let (pipeline, mesh) = match draw.kind {
                    DrawKind::Window(index) => (
                        &self.pipelines.window,
                        scene.portals.get(index).and_then(|p| self.window_mesh(p)),
                    ),
                    DrawKind::Floor => (&self.pipelines.model_opaque, Some(&self.plane)),
                    DrawKind::Mesh { model, mesh, transparent } => (
                        if transparent {
                            &self.pipelines.model_transparent
                        } else {
                            &self.pipelines.model_opaque
                        },
                        self.models.mesh(model, mesh),
                    ),
                    DrawKind::Fade | DrawKind::Overlay => (&self.pipelines.flat, Some(&self.quad)),
                    DrawKind::Takeover => (&self.pipelines.flat_mask, Some(&self.quad)),
                };
                let Some(mesh) = mesh else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_stencil_reference(draw.stencil);
                pass.set_bind_group(1, &self.draw_bind_group, &[(slot * DRAW_STRIDE) as u32]);
                mesh.draw(&mut pass);
            }
        }
        context.submit(encoder);
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec2;

    use super::*;
    use crate::assets::LoadedModel;
    use crate::camera::core::Camera;
    use crate::scene::description::{
        AmbientLight, DirectionalLight, ModelInstance, ReflectorParams, SpotLight, WindowQuad,
    };

    fn portal(id: &str, blend: f32) -> PortalDescription {
        PortalDescription {
            id: id.to_owned(),
            window: WindowQuad {
                transform: Mat4::IDENTITY,
                width: 1.0,
                height: 1.6,
                corner_radius: 0.1,
            },
            background: Color::rgb(0.5, 0.25, 0.0),
            blend,
            hovered: false,
            interactive: blend > 0.0,
            spot_light: SpotLight {
                position: Vec3::new(0.0, 5.0, 5.0),
                intensity: 1.0,
                angle: 0.5,
                penumbra: 0.7,
            },
            floor: None,
            model: None,
            labels: Vec::new(),
        }
    }

    fn scene(portals: Vec<PortalDescription>) -> SceneDescription {
        SceneDescription {
            background: Color::rgb(0.94, 0.94, 0.94),
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, 2.0),
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect: 1.0,
                fovy: 75.0,
                znear: 0.1,
                zfar: 1000.0,
            },
            ambient: AmbientLight { intensity: 0.1 },
            directional: DirectionalLight {
                position: Vec3::splat(10.0),
                intensity: 0.25,
            },
            portals,
            bloom: None,
            loading: false,
            loading_progress: 1.0,
            hint: "",
        }
    }

    #[test]
    fn idle_portals_draw_only_windows() {
        let draws = plan_draws(&scene(vec![portal("a", 0.0), portal("b", 0.0)]), 2.2);
        let kinds: Vec<DrawKind> = draws.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, [DrawKind::Window(0), DrawKind::Window(1)]);
        assert_eq!(draws[1].stencil, 2);
    }

    #[test]
    fn most_blended_portal_draws_last_and_takes_over() {
        let draws = plan_draws(&scene(vec![portal("a", 0.9), portal("b", 0.0), portal("c", 0.3)]), 2.2);
        let kinds: Vec<DrawKind> = draws.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            [
                DrawKind::Window(1),
                DrawKind::Window(2),
                DrawKind::Fade,
                DrawKind::Window(0),
                DrawKind::Takeover,
            ]
        );
        assert_eq!(draws[4].stencil, 1);
        assert!((draws[4].uniform.color[3] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn model_meshes_use_portal_stencil() {
        let model = Arc::new(LoadedModel::default());
        let mut p = portal("a", 0.0);
        p.model = Some(ModelInstance {
            model: Arc::clone(&model),
            transform: Mat4::IDENTITY,
            materials: vec![Material::default(), crate::gallery::HIGHLIGHT_MATERIAL].into(),
            clips: Vec::new(),
        });
        p.floor = Some(FloorDescription {
            transform: Mat4::IDENTITY,
            size: Vec2::splat(10.0),
            color: Color::WHITE,
            reflector: ReflectorParams::default(),
        });
        let draws = plan_draws(&scene(vec![portal("x", 0.0), p]), 2.2);
        let meshes: Vec<&PlannedDraw> = draws
            .iter()
            .filter(|d| matches!(d.kind, DrawKind::Mesh { .. } | DrawKind::Floor))
            .collect();
        assert_eq!(meshes.len(), 3);
        assert!(meshes.iter().all(|d| d.stencil == 2));
        assert_eq!(
            meshes[2].kind,
            DrawKind::Mesh {
                model: model_key(&model),
                mesh: 1,
                transparent: true
            }
        );
    }

    #[test]
    fn loading_bar_is_drawn_last() {
        let mut s = scene(vec![portal("a", 0.0)]);
        s.loading = true;
        s.loading_progress = 0.5;
        let draws = plan_draws(&s, 2.2);
        let last = draws.last().unwrap();
        assert_eq!(last.kind, DrawKind::Overlay);
        assert!((last.uniform.rect[2] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn clear_color_follows_blend() {
        let s = scene(vec![portal("a", 0.0)]);
        assert_eq!(clear_color(&s), s.background);
        let s = scene(vec![portal("a", 1.0)]);
        assert_eq!(clear_color(&s), Color::rgb(0.5, 0.25, 0.0));
    }

    #[test]
    fn frame_uniform_matches_shader_layout() {
        // mat4 + (vec3, f32) * 2 + vec4 * 2
        assert_eq!(size_of::<FrameUniform>(), 64 + 32 + 32);
        let u = frame_uniform(&scene(Vec::new()));
        assert_eq!(u.camera.position, [0.0, 0.0, 2.0]);
        assert_eq!(u.camera.forward, [0.0, 0.0, -1.0]);
        assert_eq!(u.ambient[0], 0.1);
    }

    #[test]
    fn draw_uniform_fits_its_slot() {
        assert!(size_of::<DrawUniform>() <= DRAW_STRIDE);
        let bytes = pack_draws(&plan_draws(&scene(vec![portal("a", 0.0)]), 2.2));
        assert_eq!(bytes.len(), DRAW_STRIDE);
    }
}
