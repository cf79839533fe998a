//! The declarative per-frame render list.
//!
//! [`Gallery::describe`](crate::gallery::Gallery::describe) flattens the
//! gallery into a [`SceneDescription`] once per frame. Every transform in it is
//! already in world space, so a renderer needs no access to the scene graph.
//! Parts the stock renderer does not draw (labels, the reflector floor
//! parameters, bloom) are still described in full for other collaborators.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use crate::animation::ClipAction;
use crate::assets::{LoadedModel, Material};
use crate::camera::core::Camera;
use crate::util::color::Color;

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct SceneDescription {
    /// Outer scene clear color.
    pub background: Color,
    /// Camera for this frame.
    pub camera: Camera,
    /// Uniform fill light.
    pub ambient: AmbientLight,
    /// Directional fill light.
    pub directional: DirectionalLight,
    /// Portals in layout order.
    pub portals: Vec<PortalDescription>,
    /// Bloom pass, when enabled.
    pub bloom: Option<BloomPass>,
    /// Whether the loading indicator is visible.
    pub loading: bool,
    /// Fraction of model loads that have settled, `[0, 1]`.
    pub loading_progress: f32,
    /// On-screen navigation hint.
    pub hint: &'static str,
}

/// Uniform ambient light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Light shining from `position` toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Position the light shines from.
    pub position: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Bloom post-process settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomPass {
    /// Luminance above which pixels bloom.
    pub luminance_threshold: f32,
    /// Softness of the threshold.
    pub luminance_smoothing: f32,
    /// Height of the blur render target in pixels.
    pub height: u32,
}

/// The rounded rectangle a portal is seen through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowQuad {
    /// Window center and orientation; the quad spans local X/Y.
    pub transform: Mat4,
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
    /// Corner radius.
    pub corner_radius: f32,
}

/// Spotlight of a portal's nested scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// World position.
    pub position: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Cone half-angle, radians.
    pub angle: f32,
    /// Fraction of the cone that fades out.
    pub penumbra: f32,
}

/// Blurred mirror parameters for a reflective floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectorParams {
    /// Blur kernel size in pixels (x, y).
    pub blur: [f32; 2],
    /// Reflection render target resolution.
    pub resolution: u32,
    /// How much blur mixes in.
    pub mix_blur: f32,
    /// Reflection strength.
    pub mix_strength: f32,
    /// Depth influence scale.
    pub depth_scale: f32,
    /// Lower depth threshold.
    pub min_depth_threshold: f32,
    /// Upper depth threshold.
    pub max_depth_threshold: f32,
    /// Surface metalness.
    pub metalness: f32,
    /// Surface roughness.
    pub roughness: f32,
}

impl Default for ReflectorParams {
    fn default() -> Self {
        Self {
            blur: [300.0, 100.0],
            resolution: 1024,
            mix_blur: 1.0,
            mix_strength: 10.0,
            depth_scale: 1.0,
            min_depth_threshold: 1.0,
            max_depth_threshold: 1.0,
            metalness: 1.0,
            roughness: 0.7,
        }
    }
}

/// Reflective floor under a portal's model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorDescription {
    /// Plane transform; the plane spans local X/Y.
    pub transform: Mat4,
    /// Plane size.
    pub size: Vec2,
    /// Tint.
    pub color: Color,
    /// Mirror parameters.
    pub reflector: ReflectorParams,
}

/// A loaded model placed in a portal's nested scene.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    /// Shared mesh data.
    pub model: Arc<LoadedModel>,
    /// Model-to-world transform.
    pub transform: Mat4,
    /// Material per mesh, after any override.
    pub materials: Arc<[Material]>,
    /// Clip clocks.
    pub clips: Vec<ClipAction>,
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorX {
    /// Text starts at the anchor.
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    /// First line hangs below the anchor.
    Top,
    /// Text block is centered on the anchor.
    Middle,
}

/// Font face weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular face.
    Regular,
    /// Medium face.
    Medium,
}

/// A text label attached to a portal.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Text; may contain line breaks.
    pub text: String,
    /// Em size in world units.
    pub font_size: f32,
    /// Line height as a multiple of `font_size`.
    pub line_height: f32,
    /// Horizontal anchor.
    pub anchor_x: AnchorX,
    /// Vertical anchor.
    pub anchor_y: AnchorY,
    /// Face weight.
    pub weight: FontWeight,
    /// Anchor placement; text runs along local +X.
    pub transform: Mat4,
}

/// One portal of the frame.
#[derive(Debug, Clone)]
pub struct PortalDescription {
    /// Portal id.
    pub id: String,
    /// Window geometry.
    pub window: WindowQuad,
    /// Nested scene clear color.
    pub background: Color,
    /// How far the nested scene has taken over the view, `[0, 1]`.
    pub blend: f32,
    /// Whether the pointer affordance is on.
    pub hovered: bool,
    /// Whether the nested scene receives pointer events (portal is active).
    pub interactive: bool,
    /// Nested scene key light.
    pub spot_light: SpotLight,
    /// Reflective floor, if any.
    pub floor: Option<FloorDescription>,
    /// Model, once loaded.
    pub model: Option<ModelInstance>,
    /// Title, id and author labels.
    pub labels: Vec<Label>,
}
