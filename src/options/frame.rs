use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::gallery::GOLDEN_RATIO;

/// How auto-rotation speeds are applied.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Speeds are radians added once per rendered frame, so the spin rate
    /// follows the display refresh rate.
    #[default]
    PerFrame,
    /// Speeds are radians per 1/60 s of elapsed time, independent of the
    /// refresh rate.
    PerSecond60,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Portals", inline)]
#[serde(default)]
/// Shared geometry and animation parameters for every portal frame.
pub struct FrameOptions {
    /// Seconds for a portal's blend factor to settle after (de)activation.
    #[schemars(title = "Blend Time", range(min = 0.05, max = 2.0), extend("step" = 0.05))]
    pub blend_smooth_time: f32,
    /// Window width in world units.
    #[schemars(skip)]
    pub window_width: f32,
    /// Window height in world units.
    #[schemars(skip)]
    pub window_height: f32,
    /// Corner radius of the rounded window.
    #[schemars(skip)]
    pub corner_radius: f32,
    /// Auto-rotation timing.
    #[schemars(title = "Rotation Timing")]
    pub rotation_mode: RotationMode,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            blend_smooth_time: 0.2,
            window_width: 1.0,
            window_height: GOLDEN_RATIO,
            corner_radius: 0.1,
            rotation_mode: RotationMode::PerFrame,
        }
    }
}
