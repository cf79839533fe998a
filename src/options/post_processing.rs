use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Effects", inline)]
#[serde(default)]
/// Bloom pass parameters handed to the post-process collaborator.
pub struct PostProcessingOptions {
    /// Whether the bloom pass is requested at all.
    #[schemars(title = "Bloom")]
    pub bloom_enabled: bool,
    /// Luminance above which pixels bloom.
    #[schemars(title = "Bloom Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub bloom_luminance_threshold: f32,
    /// Softness of the threshold knee.
    #[schemars(title = "Bloom Smoothing", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub bloom_luminance_smoothing: f32,
    /// Vertical resolution of the blur chain.
    #[schemars(skip)]
    pub bloom_height: u32,
}

impl Default for PostProcessingOptions {
    fn default() -> Self {
        Self {
            bloom_enabled: true,
            bloom_luminance_threshold: 0.9,
            bloom_luminance_smoothing: 0.9,
            bloom_height: 300,
        }
    }
}
