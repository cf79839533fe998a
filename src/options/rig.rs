use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::gallery::GOLDEN_RATIO;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera Rig", inline)]
#[serde(default)]
/// Poses the rig hands to the camera controller.
///
/// Offsets are expressed in the focused portal's local frame.
pub struct RigOptions {
    /// Eye position while no portal is focused.
    #[schemars(skip)]
    pub default_eye: [f32; 3],
    /// Look-at target while no portal is focused.
    #[schemars(skip)]
    pub default_focus: [f32; 3],
    /// Eye offset from the focused portal's origin.
    #[schemars(skip)]
    pub eye_offset: [f32; 3],
    /// Look-at offset from the focused portal's origin.
    #[schemars(skip)]
    pub focus_offset: [f32; 3],
}

impl Default for RigOptions {
    fn default() -> Self {
        Self {
            default_eye: [0.0, 0.0, 2.0],
            default_focus: [0.0, 0.0, 0.0],
            eye_offset: [0.0, GOLDEN_RATIO * 0.75, 0.25],
            focus_offset: [0.0, GOLDEN_RATIO / 2.0, -2.0],
        }
    }
}
