use std::f32::consts::FRAC_PI_2;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and controller parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Seconds the controller needs to cover most of a look-at transition.
    #[schemars(title = "Transition Time", range(min = 0.05, max = 2.0), extend("step" = 0.05))]
    pub smooth_time: f32,
    /// Smallest polar angle (radians from +Y) the eye may take around the
    /// target.
    #[schemars(skip)]
    pub min_polar_angle: f32,
    /// Largest polar angle; π/2 keeps the eye above the target's horizon.
    #[schemars(skip)]
    pub max_polar_angle: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            smooth_time: 0.25,
            min_polar_angle: 0.0,
            max_polar_angle: FRAC_PI_2,
        }
    }
}
