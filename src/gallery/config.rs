//! Static gallery layout: one [`PortalSpec`] per portal.

use std::f32::consts::PI;
use std::path::Path;

use glam::Vec3;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::VitrineError;
use crate::util::color::Color;

/// Placement of a portal's model inside its nested scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelTransform {
    /// Uniform scale.
    pub scale: f32,
    /// Position.
    pub position: Vec3,
    /// Initial Euler rotation (XYZ, radians).
    pub rotation: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

/// The spotlight that lights a portal's model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpotLightSpec {
    /// Light position in the nested scene.
    pub position: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Half-angle of the cone, radians.
    pub cone_angle: f32,
    /// Fraction of the cone that fades out, `[0, 1]`.
    pub penumbra: f32,
}

impl Default for SpotLightSpec {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 5.0),
            intensity: 1.0,
            cone_angle: PI / 6.0,
            penumbra: 0.0,
        }
    }
}

fn default_rotate_speeds() -> Vec3 {
    Vec3::splat(0.01)
}

/// Static description of one portal.
///
/// `id` doubles as the route key (`/item/<id>`) and as the name of the
/// portal's window node in the scene graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortalSpec {
    /// Unique portal id.
    pub id: String,
    /// Title label; may contain line breaks.
    pub display_name: String,
    /// Credit label.
    pub author_label: String,
    /// Background of the nested scene.
    pub background_color: Color,
    /// Position of the portal group relative to the gallery root.
    #[serde(default)]
    pub layout_offset: Vec3,
    /// Euler rotation (XYZ, radians) of the portal group.
    #[serde(default)]
    pub layout_rotation: Vec3,
    /// Model asset path, resolved by the asset loader.
    pub model_asset_path: String,
    /// Model placement.
    #[serde(default)]
    pub model_transform: ModelTransform,
    /// Spotlight parameters.
    #[serde(default)]
    pub light: SpotLightSpec,
    /// Whether a reflective floor sits under the model.
    #[serde(default)]
    pub has_reflective_floor: bool,
    /// Whether the model spins.
    #[serde(default)]
    pub auto_rotate: bool,
    /// Per-axis spin increments, radians.
    #[serde(default = "default_rotate_speeds")]
    pub auto_rotate_speeds: Vec3,
    /// Replace every model material with the highlight material on load.
    #[serde(default)]
    pub special_material_override: bool,
}

impl PortalSpec {
    /// Portal with the given labels and every optional field defaulted.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        author_label: impl Into<String>,
        background_color: Color,
        model_asset_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            author_label: author_label.into(),
            background_color,
            layout_offset: Vec3::ZERO,
            layout_rotation: Vec3::ZERO,
            model_asset_path: model_asset_path.into(),
            model_transform: ModelTransform::default(),
            light: SpotLightSpec::default(),
            has_reflective_floor: false,
            auto_rotate: false,
            auto_rotate_speeds: default_rotate_speeds(),
            special_material_override: false,
        }
    }
}

fn default_group_offset() -> Vec3 {
    Vec3::new(0.0, -0.8, 0.0)
}

/// The full gallery: root offset plus portals in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    /// Offset of the group holding every portal.
    #[serde(default = "default_group_offset")]
    pub group_offset: Vec3,
    /// Portals, left to right.
    #[serde(default)]
    pub portals: Vec<PortalSpec>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let rubiks = PortalSpec {
            layout_offset: Vec3::new(-1.15, 0.0, 0.0),
            layout_rotation: Vec3::new(0.0, 0.5, 0.0),
            model_transform: ModelTransform {
                scale: 0.62,
                position: Vec3::new(0.2, -0.3, -4.0),
                rotation: Vec3::ZERO,
            },
            light: SpotLightSpec {
                position: Vec3::new(0.0, -0.7, -2.0),
                intensity: 1.0,
                cone_angle: PI / 6.0,
                penumbra: 0.7,
            },
            has_reflective_floor: true,
            ..PortalSpec::new(
                "01",
                "Rubix\nCube",
                ":SDC PERFORMANCE™️",
                Color::from_rgb8(0xe4, 0xcd, 0xac),
                "/free__rubiks_cube_3d/scene.gltf",
            )
        };
        let balloon_dog = PortalSpec {
            model_transform: ModelTransform {
                scale: 10.1089,
                position: Vec3::new(0.0, -2.0, -6.0),
                rotation: Vec3::new(0.0, 0.5, 0.0),
            },
            light: SpotLightSpec {
                position: Vec3::new(-10.0, 10.0, 15.0),
                intensity: 10.0,
                cone_angle: PI / 6.0,
                penumbra: 0.7,
            },
            auto_rotate: true,
            auto_rotate_speeds: Vec3::new(0.0, 0.02, 0.0),
            special_material_override: true,
            ..PortalSpec::new(
                "02",
                "Ballon\nDog",
                ":Octaclee",
                Color::from_rgb8(0x30, 0x19, 0x34),
                "/ballon_dog/scene.gltf",
            )
        };
        let glados = PortalSpec {
            layout_offset: Vec3::new(1.15, 0.0, 0.0),
            layout_rotation: Vec3::new(0.0, -0.5, 0.0),
            model_transform: ModelTransform {
                scale: 10.5,
                position: Vec3::new(0.01, -0.1, -3.0),
                rotation: Vec3::ZERO,
            },
            light: SpotLightSpec {
                position: Vec3::new(-5.0, 3.0, 0.0),
                intensity: 0.8,
                cone_angle: PI / 6.0,
                penumbra: 0.7,
            },
            auto_rotate: true,
            auto_rotate_speeds: Vec3::new(0.01, 0.0, 0.01),
            ..PortalSpec::new(
                "03",
                "GLaDOS",
                ":DAVID.3D.ART",
                Color::from_rgb8(0xff, 0x45, 0x00),
                "/GLaDOS/scene.gltf",
            )
        };
        Self {
            group_offset: default_group_offset(),
            portals: vec![rubiks, balloon_dog, glados],
        }
    }
}

impl GalleryConfig {
    /// Load a gallery from a TOML file and check it.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::Io`] if the file cannot be read, and whatever
    /// [`from_toml`](Self::from_toml) returns for its contents.
    pub fn load(path: &Path) -> Result<Self, VitrineError> {
        let content = std::fs::read_to_string(path).map_err(VitrineError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse a gallery from TOML and check it.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::OptionsParse`] on malformed input and
    /// [`VitrineError::DuplicatePortalId`] if two portals share an id.
    pub fn from_toml(content: &str) -> Result<Self, VitrineError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that portal ids are pairwise distinct.
    ///
    /// # Errors
    ///
    /// Returns [`VitrineError::DuplicatePortalId`] naming the first repeat.
    pub fn validate(&self) -> Result<(), VitrineError> {
        let mut seen = FxHashSet::default();
        for portal in &self.portals {
            if !seen.insert(portal.id.as_str()) {
                return Err(VitrineError::DuplicatePortalId(portal.id.clone()));
            }
        }
        Ok(())
    }
}
