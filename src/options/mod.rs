//! Centralized rendering/interaction options with TOML preset support.
//!
//! All tweakable settings (display, camera, rig poses, portal frames,
//! lighting, post-processing, keybindings) are consolidated here. Options
//! serialize to/from TOML so a gallery can ship its own preset.

mod camera;
mod display;
mod frame;
mod keybindings;
mod lighting;
mod post_processing;
mod rig;

use std::path::{Path, PathBuf};

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use frame::{FrameOptions, RotationMode};
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
pub use post_processing::PostProcessingOptions;
pub use rig::RigOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VitrineError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Directory that model asset paths are resolved against.
    #[schemars(skip)]
    pub asset_root: PathBuf,
    /// Window and presentation settings.
    pub display: DisplayOptions,
    /// Camera projection and controller parameters.
    pub camera: CameraOptions,
    /// Default and focused camera poses.
    pub rig: RigOptions,
    /// Portal frame geometry and animation.
    pub frame: FrameOptions,
    /// Fill lighting.
    pub lighting: LightingOptions,
    /// Post-processing effect parameters.
    pub post_processing: PostProcessingOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            display: DisplayOptions::default(),
            camera: CameraOptions::default(),
            rig: RigOptions::default(),
            frame: FrameOptions::default(),
            lighting: LightingOptions::default(),
            post_processing: PostProcessingOptions::default(),
            keybindings: KeybindingOptions::default(),
        }
    }
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::Io`] if the file cannot be read and
    /// [`VitrineError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, VitrineError> {
        let content = std::fs::read_to_string(path).map_err(VitrineError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, VitrineError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), VitrineError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VitrineError::Io)?;
        }
        std::fs::write(path, content).map_err(VitrineError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[frame]
blend_smooth_time = 0.5
rotation_mode = 'per_second60'
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.frame.blend_smooth_time, 0.5);
        assert_eq!(opts.frame.rotation_mode, RotationMode::PerSecond60);
        // Everything else should be default
        assert_eq!(opts.frame.window_width, 1.0);
        assert_eq!(opts.camera.fovy, 75.0);
        assert_eq!(opts.display.background, "#f0f0f0");
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera]\nfovy = 'wide'").unwrap_err();
        assert!(matches!(err, VitrineError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        use crate::input::KeyAction;
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::Back));
        assert_eq!(
            opts.keybindings.lookup("ArrowRight"),
            Some(KeyAction::NextPortal)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn rebinding_survives_load() {
        let opts = Options::from_toml(
            r#"
[keybindings.bindings]
Back = "Backspace"
"#,
        )
        .unwrap();
        assert_eq!(
            opts.keybindings.lookup("Backspace"),
            Some(crate::input::KeyAction::Back)
        );
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("display"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("frame"));
        assert!(props.contains_key("post_processing"));

        // Skipped sections should be absent
        assert!(!props.contains_key("keybindings"));
        assert!(!props.contains_key("asset_root"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
    }
}
