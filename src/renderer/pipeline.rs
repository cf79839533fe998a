//! Render pipelines of the gallery pass.
//!
//! Every pipeline shares one shader module, one vertex layout and one
//! depth-stencil format; they differ in entry points, blending and the
//! depth/stencil test. The stencil buffer holds `portal index + 1` inside
//! each window so a portal's nested scene can only appear through it.

use wgpu::{CompareFunction, StencilOperation};

use super::mesh::vertex_layout;
use crate::gpu::pipeline_helpers::{alpha_blend, depth_stencil, stencil, uniform_buffer};

/// All pipelines plus the bind group layouts they were built against.
pub struct GalleryPipelines {
    /// Group 0: per-frame camera and fill light.
    pub frame_layout: wgpu::BindGroupLayout,
    /// Group 1: per-draw uniforms, addressed by dynamic offset.
    pub draw_layout: wgpu::BindGroupLayout,
    /// Window surfaces; writes the portal's stencil reference.
    pub window: wgpu::RenderPipeline,
    /// Opaque nested-scene meshes, clipped to the stencil reference.
    pub model_opaque: wgpu::RenderPipeline,
    /// Blended nested-scene meshes, clipped to the stencil reference.
    pub model_transparent: wgpu::RenderPipeline,
    /// Screen-space quad, blended over everything.
    pub flat: wgpu::RenderPipeline,
    /// Screen-space quad that also claims the stencil and resets depth.
    pub flat_mask: wgpu::RenderPipeline,
}

struct PipelineDesc<'a> {
    label: &'a str,
    vs: &'a str,
    fs: &'a str,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
    depth_compare: CompareFunction,
    stencil: wgpu::StencilState,
}

impl GalleryPipelines {
    /// Build every pipeline for the given color format.
    #[must_use]
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/gallery.wgsl"));

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Gallery Frame Layout"),
            entries: &[uniform_buffer(0, false)],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Gallery Draw Layout"),
            entries: &[uniform_buffer(0, true)],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Gallery Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let build = |desc: PipelineDesc<'_>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(desc.vs),
                    buffers: &[vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(desc.fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: desc.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil(
                    desc.depth_write,
                    desc.depth_compare,
                    desc.stencil,
                )),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let window = build(PipelineDesc {
            label: "Portal Window",
            vs: "vs_mesh",
            fs: "fs_window",
            blend: None,
            depth_write: false,
            depth_compare: CompareFunction::Always,
            stencil: stencil(CompareFunction::Always, StencilOperation::Replace),
        });
        let model_opaque = build(PipelineDesc {
            label: "Portal Model",
            vs: "vs_mesh",
            fs: "fs_lit",
            blend: None,
            depth_write: true,
            depth_compare: CompareFunction::Less,
            stencil: stencil(CompareFunction::Equal, StencilOperation::Keep),
        });
        let model_transparent = build(PipelineDesc {
            label: "Portal Model Transparent",
            vs: "vs_mesh",
            fs: "fs_lit",
            blend: alpha_blend(),
            depth_write: false,
            depth_compare: CompareFunction::Less,
            stencil: stencil(CompareFunction::Equal, StencilOperation::Keep),
        });
        let flat = build(PipelineDesc {
            label: "Screen Quad",
            vs: "vs_flat",
            fs: "fs_flat",
            blend: alpha_blend(),
            depth_write: false,
            depth_compare: CompareFunction::Always,
            stencil: stencil(CompareFunction::Always, StencilOperation::Keep),
        });
        let flat_mask = build(PipelineDesc {
            label: "Screen Quad Mask",
            vs: "vs_flat",
            fs: "fs_flat",
            blend: alpha_blend(),
            depth_write: true,
            depth_compare: CompareFunction::Always,
            stencil: stencil(CompareFunction::Always, StencilOperation::Replace),
        });

        Self {
            frame_layout,
            draw_layout,
            window,
            model_opaque,
            model_transparent,
            flat,
            flat_mask,
        }
    }
}
