//! One portal: window, labels, nested scene and its activation blend.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use super::config::PortalSpec;
use crate::animation::AnimationMixer;
use crate::assets::{AssetSlot, LoadedModel, LoadingGate, Material};
use crate::navigation::Route;
use crate::options::{FrameOptions, RotationMode};
use crate::scene::description::{
    AnchorX, AnchorY, FloorDescription, FontWeight, Label, ModelInstance,
    PortalDescription, ReflectorParams, SpotLight, WindowQuad,
};
use crate::scene::{NodeId, SceneGraph};
use crate::util::color::Color;
use crate::util::easing::damp;

/// Material swapped onto every mesh of a portal that asks for the highlight
/// override.
pub const HIGHLIGHT_MATERIAL: Material = Material {
    base_color: Color {
        r: 1.0,
        g: 105.0 / 255.0,
        b: 180.0 / 255.0,
        a: 0.7,
    },
    roughness: 0.2,
    metalness: 0.99,
    transparent: true,
};

/// Side length of the reflective floor.
const FLOOR_SIZE: f32 = 10.0;

/// A portal's blend factor and the value it is heading for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendState {
    value: f32,
    target: f32,
}

impl BlendState {
    /// Current blend in `[0, 1]`.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Target of the last step.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Damp toward `target` over `dt` seconds.
    pub fn step(&mut self, target: f32, smooth_time: f32, dt: f32) {
        self.target = target;
        self.value = damp(self.value, target, smooth_time, dt).clamp(0.0, 1.0);
    }
}

#[derive(Debug, Clone)]
enum ModelState {
    Loading,
    Attached {
        model: Arc<LoadedModel>,
        materials: Arc<[Material]>,
    },
    Missing,
}

/// A single portal unit.
///
/// A frame only ever writes its own model node in the scene graph.
#[derive(Debug)]
pub struct Frame {
    spec: PortalSpec,
    group: NodeId,
    window: NodeId,
    model_node: NodeId,
    blend: BlendState,
    hovered: bool,
    active: bool,
    model: ModelState,
    mixer: AnimationMixer,
}

impl Frame {
    pub(crate) fn new(spec: PortalSpec, group: NodeId, window: NodeId, model_node: NodeId) -> Self {
        Self {
            spec,
            group,
            window,
            model_node,
            blend: BlendState::default(),
            hovered: false,
            active: false,
            model: ModelState::Loading,
            mixer: AnimationMixer::new(),
        }
    }

    /// Static description of this portal.
    #[must_use]
    pub fn spec(&self) -> &PortalSpec {
        &self.spec
    }

    /// Portal id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// Blend state.
    #[must_use]
    pub fn blend(&self) -> BlendState {
        self.blend
    }

    /// Whether the pointer affordance is on.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether this portal matched the active id on the last tick.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Scene node named after the portal id.
    #[must_use]
    pub fn window_node(&self) -> NodeId {
        self.window
    }

    /// Whether a model is attached.
    #[must_use]
    pub fn has_model(&self) -> bool {
        matches!(self.model, ModelState::Attached { .. })
    }

    /// Whether the model failed to load.
    #[must_use]
    pub fn is_missing_model(&self) -> bool {
        matches!(self.model, ModelState::Missing)
    }

    /// Clip clocks of the attached model.
    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    /// Run one frame.
    pub(crate) fn tick(
        &mut self,
        active_id: Option<&str>,
        dt: f32,
        options: &FrameOptions,
        graph: &mut SceneGraph,
        gate: &LoadingGate,
    ) {
        self.poll_model(gate);

        self.active = active_id == Some(self.spec.id.as_str());
        let target = if self.active { 1.0 } else { 0.0 };
        self.blend.step(target, options.blend_smooth_time, dt);

        if self.spec.auto_rotate && self.has_model() {
            let step = match options.rotation_mode {
                RotationMode::PerFrame => 1.0,
                RotationMode::PerSecond60 => dt * 60.0,
            };
            if let Some(local) = graph.local_mut(self.model_node) {
                local.rotation += self.spec.auto_rotate_speeds * step;
            }
        }

        self.mixer.update(dt);
    }

    fn poll_model(&mut self, gate: &LoadingGate) {
        if !matches!(self.model, ModelState::Loading) {
            return;
        }
        match gate.slot(&self.spec.model_asset_path) {
            Some(AssetSlot::Ready(model)) => self.attach(Arc::clone(model)),
            Some(AssetSlot::Failed(_)) | None => {
                log::info!("portal {} shows no model", self.spec.id);
                self.model = ModelState::Missing;
            }
            Some(AssetSlot::Pending) => {}
        }
    }

    /// Attach a loaded model, applying the highlight override if requested.
    pub(crate) fn attach(&mut self, model: Arc<LoadedModel>) {
        let materials: Arc<[Material]> = if self.spec.special_material_override {
            model.meshes.iter().map(|_| HIGHLIGHT_MATERIAL).collect()
        } else {
            model.meshes.iter().map(|m| m.material).collect()
        };
        self.mixer.play_all(&model.clips);
        log::debug!(
            "portal {} attached model ({} triangles, {} clips)",
            self.spec.id,
            model.triangle_count(),
            model.clips.len()
        );
        self.model = ModelState::Attached { model, materials };
    }

    /// Set the pointer affordance.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Flip the pointer affordance (single click).
    pub fn toggle_hovered(&mut self) {
        self.hovered = !self.hovered;
    }

    /// Route a double click on the window navigates to.
    #[must_use]
    pub fn route(&self) -> Route {
        Route::item(self.spec.id.clone())
    }

    /// Flatten into the render list.
    #[must_use]
    pub fn describe(&self, graph: &SceneGraph, options: &FrameOptions) -> PortalDescription {
        let group = graph.world_matrix(self.group);
        let bg = self.spec.background_color;

        let floor = self.spec.has_reflective_floor.then(|| FloorDescription {
            transform: Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))
                * Mat4::from_rotation_x(-FRAC_PI_2),
            size: Vec2::splat(FLOOR_SIZE),
            color: bg,
            reflector: ReflectorParams::default(),
        });

        let model = match &self.model {
            ModelState::Attached { model, materials } => Some(ModelInstance {
                model: Arc::clone(model),
                transform: graph.world_matrix(self.model_node),
                materials: Arc::clone(materials),
                clips: self.mixer.actions().to_vec(),
            }),
            ModelState::Loading | ModelState::Missing => None,
        };

        PortalDescription {
            id: self.spec.id.clone(),
            window: WindowQuad {
                transform: graph.world_matrix(self.window),
                width: options.window_width,
                height: options.window_height,
                corner_radius: options.corner_radius,
            },
            background: bg,
            blend: self.blend.value(),
            hovered: self.hovered,
            interactive: self.active,
            spot_light: SpotLight {
                position: self.spec.light.position,
                intensity: self.spec.light.intensity,
                angle: self.spec.light.cone_angle,
                penumbra: self.spec.light.penumbra,
            },
            floor,
            model,
            labels: self.labels(group),
        }
    }

    fn labels(&self, group: Mat4) -> Vec<Label> {
        let at = |x: f32, y: f32| group * Mat4::from_translation(Vec3::new(x, y, 0.01));
        vec![
            Label {
                text: self.spec.display_name.clone(),
                font_size: 0.18,
                line_height: 0.8,
                anchor_x: AnchorX::Left,
                anchor_y: AnchorY::Top,
                weight: FontWeight::Medium,
                transform: at(-0.375, 1.525),
            },
            Label {
                text: format!(":{}", self.spec.id),
                font_size: 0.1,
                line_height: 1.0,
                anchor_x: AnchorX::Right,
                anchor_y: AnchorY::Middle,
                weight: FontWeight::Regular,
                transform: at(0.4, 0.15),
            },
            Label {
                text: self.spec.author_label.clone(),
                font_size: 0.04,
                line_height: 1.0,
                anchor_x: AnchorX::Right,
                anchor_y: AnchorY::Middle,
                weight: FontWeight::Regular,
                transform: at(0.0, 0.132),
            },
        ]
    }
}
