use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Window and presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
pub struct DisplayOptions {
    /// Gallery background as a `#rrggbb` hex string.
    #[schemars(title = "Background")]
    pub background: String,
    /// Output gamma applied in the final shader stage.
    #[schemars(title = "Gamma", range(min = 1.0, max = 3.0), extend("step" = 0.1))]
    pub gamma: f32,
    /// Window title prefix.
    #[schemars(skip)]
    pub title: String,
    /// Frame cap (0 = unlimited).
    #[schemars(title = "FPS Limit", range(min = 0, max = 300))]
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: "#f0f0f0".to_owned(),
            gamma: 2.2,
            title: "Vitrine".to_owned(),
            target_fps: 0,
        }
    }
}
